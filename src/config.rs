use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Optional JSON config looked up in the working directory.
pub const CONFIG_FILE: &str = "trln-dup-viewer.json";

pub const ENV_DATA_PATH: &str = "TRLN_DATA_PATH";
pub const ENV_START_YEAR: &str = "TRLN_START_YEAR";
pub const ENV_TOP_N: &str = "TRLN_TOP_N";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Startup settings. Precedence: CLI argument > environment > config file >
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Processed title CSV.
    pub data_path: PathBuf,
    /// First upload year selected when the viewer opens.
    pub default_start_year: i32,
    /// Length of the top module / press lists.
    pub top_n: usize,
    /// Suggested file name for the CSV download.
    pub download_file_name: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("oup_upso_processed.csv"),
            default_start_year: 2015,
            top_n: 10,
            download_file_name: "TRLN_OUP_duplication.csv".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Resolve from the process environment and command line.
    pub fn resolve() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let base = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        base.with_overrides(|name| std::env::var(name).ok(), std::env::args().skip(1))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let cfg: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        if cfg.top_n == 0 {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "top_n",
                expected: "positive integer",
            });
        }
        Ok(cfg)
    }

    /// Apply environment variables (looked up through `env`) and positional
    /// arguments. The first argument is the data path.
    pub fn with_overrides<F, I>(mut self, env: F, args: I) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        if let Some(path) = env(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(value) = env(ENV_START_YEAR) {
            self.default_start_year = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_START_YEAR,
                value: value.clone(),
                expected: "year",
            })?;
        }
        if let Some(value) = env(ENV_TOP_N) {
            self.top_n = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: ENV_TOP_N,
                        value,
                        expected: "positive integer",
                    })
                }
            };
        }
        if let Some(path) = args.into_iter().next() {
            self.data_path = PathBuf::from(path);
        }
        Ok(self)
    }
}
