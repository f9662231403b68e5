use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::ViewerConfig;
use crate::data::aggregate::pct_label;
use crate::data::filter::{Filters, YearRange};
use crate::data::model::Selection;
use crate::report::{render, Catalog, Report, ReportOptions};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded titles and the precomputed download. Shared, never mutated.
    pub catalog: Arc<Catalog>,

    pub options: ReportOptions,

    /// Current side-panel selections.
    pub filters: Filters,

    /// Output of the last [`render`] for `filters`.
    pub report: Report,

    /// Colour per dup-pct bucket, fixed across filter changes.
    pub pct_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, config: &ViewerConfig) -> Self {
        let dataset = catalog.dataset();
        let filters = Filters::default_for(dataset, config.default_start_year);
        let options = ReportOptions {
            top_n: config.top_n,
        };

        let mut pcts: Vec<f64> = dataset.records.iter().map(|r| r.trln_dup_pct).collect();
        pcts.sort_by(f64::total_cmp);
        let pct_colors = ColorMap::new(pcts.into_iter().map(pct_label));

        let report = render(&catalog, &filters, &options);
        Self {
            catalog,
            options,
            filters,
            report,
            pct_colors,
            status_message: None,
        }
    }

    /// Re-run the report after a filter change.
    pub fn rerender(&mut self) {
        self.report = render(&self.catalog, &self.filters, &self.options);
    }

    pub fn set_years(&mut self, years: YearRange) {
        if self.filters.years != years {
            self.filters.years = years;
            self.rerender();
        }
    }

    pub fn set_selection(&mut self, selection: Selection) {
        if self.filters.selection != selection {
            self.filters.selection = selection;
            self.rerender();
        }
    }

    /// Write the full-dataset CSV to `path`.
    pub fn save_download(&mut self, path: &Path) -> Result<()> {
        let download = &self.report.csv;
        std::fs::write(path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Saved {} ({} bytes, {}) to {}",
            download.file_name,
            download.bytes.len(),
            download.mime,
            path.display()
        );
        self.status_message = Some(format!("Saved {}", path.display()));
        Ok(())
    }
}
