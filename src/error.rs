use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the processed CSV into a [`crate::data::model::TitleDataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("CSV missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
        reason: &'static str,
    },

    #[error("dataset contains no titles")]
    Empty,
}

/// A chart set that cannot be drawn for the current filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error(
        "Not enough {institution} data for upload years {lo} to {hi} to draw the charts. \
         Please widen the year range."
    )]
    Degenerate {
        institution: &'static str,
        lo: i32,
        hi: i32,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {0}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid config file at {0}")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("environment variable {name}='{value}' is not a valid {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("config file at {path}: {field} must be a {expected}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        expected: &'static str,
    },
}
