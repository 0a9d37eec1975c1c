use std::path::Path;

use eframe::egui;

use crate::data::loader;
use crate::geo::Geography;
use crate::state::AppState;
use crate::ui::{map, panels, table};

pub const APP_TITLE: &str = "Deforestation-free Soy";
pub const APP_SUB_TITLE: &str = "Report from 2020-2022 * Only soy properties considered";

// Conventional data locations tried at startup, most specific first.
const REPORT_PATHS: [&str; 2] = [
    "data/relatorio_soja_2020_2024-02-09.csv",
    "data/sample_report.csv",
];
const GEOGRAPHY_PATHS: [&str; 2] = ["data/BR_UF_2022.geojson", "data/br_uf_stub.geojson"];
const LEGEND_IMAGE_PATHS: [&str; 2] = ["data/color_ramp.jpg", "data/color_ramp.png"];

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SoyAtlasApp {
    pub state: AppState,
}

impl SoyAtlasApp {
    /// Start with whatever conventional data files exist; missing files are
    /// logged and skipped, the File menu can load them later.
    pub fn new() -> Self {
        let mut state = AppState::default();

        if let Some(path) = first_existing(&REPORT_PATHS) {
            match loader::load_file(path) {
                Ok(dataset) => {
                    log::info!("Loaded report {} ({} records)", path.display(), dataset.len());
                    state.set_dataset(dataset);
                }
                Err(e) => {
                    log::error!("Failed to load {}: {e:#}", path.display());
                    state.status_message = Some(format!("Error: {e:#}"));
                }
            }
        } else {
            log::warn!("No report found under data/, use File → Open report…");
        }

        if let Some(path) = first_existing(&GEOGRAPHY_PATHS) {
            match Geography::load(path) {
                Ok(geography) => {
                    log::info!("Loaded geography {}", path.display());
                    state.set_geography(geography);
                }
                Err(e) => {
                    log::error!("Failed to load {}: {e:#}", path.display());
                    state.status_message = Some(format!("Error: {e:#}"));
                }
            }
        }

        state.legend_image = first_existing(&LEGEND_IMAGE_PATHS).map(Path::to_path_buf);

        Self { state }
    }
}

fn first_existing<'a>(paths: &'a [&'a str]) -> Option<&'a Path> {
    paths.iter().map(Path::new).find(|p| p.exists())
}

impl eframe::App for SoyAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + summary statistics ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered-rows table ----
        egui::TopBottomPanel::bottom("table_panel")
            .default_height(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::rows_table(ui, &self.state);
            });

        // ---- Central panel: title, choropleth, legend image ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(APP_TITLE);
            ui.label(APP_SUB_TITLE);
            ui.separator();

            let legend_height = if self.state.legend_image.is_some() {
                70.0
            } else {
                0.0
            };
            let map_height = (ui.available_height() - legend_height).max(100.0);
            ui.allocate_ui(
                egui::vec2(ui.available_width(), map_height),
                |ui: &mut egui::Ui| {
                    map::choropleth(ui, &mut self.state);
                },
            );
            map::legend_image(ui, &self.state);
        });
    }
}
