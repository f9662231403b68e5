mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::TrlnDupViewerApp;
use config::ViewerConfig;
use eframe::egui;
use report::Catalog;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = ViewerConfig::resolve().context("resolving viewer configuration")?;
    log::debug!("Using {config:?}");

    // The dataset is loaded once; the viewer cannot run without it.
    let dataset = data::loader::load_csv(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let catalog = Catalog::new(dataset, config.download_file_name.clone())
        .context("preparing CSV download")?;
    let state = AppState::new(Arc::new(catalog), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OUP-UPSO duplication in TRLN",
        options,
        Box::new(move |_cc| Ok(Box::new(TrlnDupViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer exited with an error: {e}"))
}
