use clap::Parser;
use eframe::egui;

use problem_browser::app::ProblemBrowserApp;
use problem_browser::config::{BrowserConfig, Cli};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BrowserConfig::from(Cli::parse());
    log::info!(
        "Starting problem browser (source: {}, window: {})",
        config.source_label(),
        config.initial_window
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Problem Browser",
        options,
        Box::new(move |cc| Ok(Box::new(ProblemBrowserApp::new(cc, config)))),
    )
}
