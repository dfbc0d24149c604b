mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::EmissionsApp;
use config::DashboardConfig;
use data::loader::shared_loader;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let state = AppState::from_loader(config.clone(), shared_loader());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(EmissionsApp::new(state)))),
    )
}
