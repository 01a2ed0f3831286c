mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::PenguinsApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;

    let source = config.data.source();
    let dataset = match data::loader::load(&source) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load dataset from {source:?}: {e}");
            return Err(e).context("loading penguin dataset");
        }
    };
    log::info!(
        "Loaded {} penguins, species {:?}, islands {:?}",
        dataset.len(),
        dataset.species(),
        dataset.islands()
    );

    let state = AppState::new(Arc::new(dataset), config.filter.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Penguins Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {e}"))
}
