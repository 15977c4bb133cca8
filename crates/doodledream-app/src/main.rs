//! Main application entry point (native).

use doodledream_app::{AppConfig, DoodleDreamApp};

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting DoodleDream");

    let config = AppConfig::from_env();
    log::info!("Generation endpoint: {}", config.api_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 640.0])
            .with_title(config.title.clone()),
        ..Default::default()
    };

    let title = config.title.clone();
    let res = eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DoodleDreamApp::new(cc, config)))),
    );
    if let Err(ref e) = res {
        log::error!("eframe::run_native failed: {e}");
    }
    res
}
