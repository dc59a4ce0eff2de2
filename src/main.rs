use eframe::egui;
use anyhow::Result;

mod app;
mod config;
mod core;
mod messaging;
mod ui;
mod utils;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting Galactic Frequency Broadcaster");

    let config = config::AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([800.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Galactic Frequency Broadcaster",
        options,
        Box::new(|_cc| Ok(Box::new(app::BroadcasterApp::new(config)))),
    ).map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
