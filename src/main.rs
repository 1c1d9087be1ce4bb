mod state;
mod data;
mod error;
mod processing;
mod ui;
mod render;
mod app;

use app::PhaseSpaceApp;
use data::loader::DataSource;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Optional first argument: a sweep CSV path or an http(s) URL.
    let initial = std::env::args().nth(1).map(|arg| DataSource::parse(&arg));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Phase Space")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Phase Space",
        options,
        Box::new(move |cc| Ok(Box::new(PhaseSpaceApp::new(cc, initial)))),
    )
}
