use std::fmt;

use super::model::{Selection, TitleDataset};

// ---------------------------------------------------------------------------
// Filter state: upload-year range + institution
// ---------------------------------------------------------------------------

/// Inclusive upload-year range. `lo > hi` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        YearRange { lo, hi }
    }

    /// `[start, max_year]`, with `start` clamped into the dataset's years.
    pub fn default_for(dataset: &TitleDataset, start: i32) -> Self {
        YearRange {
            lo: start.clamp(dataset.min_year, dataset.max_year),
            hi: dataset.max_year,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.lo, self.hi)
    }
}

/// Everything the user can change in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub years: YearRange,
    pub selection: Selection,
}

impl Filters {
    pub fn default_for(dataset: &TitleDataset, start: i32) -> Self {
        Filters {
            years: YearRange::default_for(dataset, start),
            selection: Selection::All,
        }
    }
}

/// Return indices of titles uploaded within `years`, in dataset order.
pub fn filtered_indices(dataset: &TitleDataset, years: YearRange) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| years.contains(rec.upload_year))
        .map(|(i, _)| i)
        .collect()
}
