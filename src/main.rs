mod app;
mod color;
mod data;
mod format;
mod geo;
mod state;
mod ui;

use app::SoyAtlasApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::APP_TITLE,
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the legend jpg/png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(SoyAtlasApp::new()))
        }),
    )
}
