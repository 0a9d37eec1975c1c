use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader;
use crate::data::model::Metric;
use crate::format::format_metric;
use crate::geo::Geography;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets + summary statistics
// ---------------------------------------------------------------------------

/// Render the left panel: year/state multi-selects and the summary block.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No report loaded.");
        return;
    };

    // Clone the domains so we can mutate state inside the loop.
    let years: Vec<i32> = dataset.years.iter().copied().collect();
    let codes: Vec<String> = dataset.state_codes.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year multi-select ----
            let n_years = state.selection.years.len();
            let year_header = if n_years == 0 {
                format!("Year  (all {})", years.len())
            } else {
                format!("Year  ({n_years}/{})", years.len())
            };
            egui::CollapsingHeader::new(RichText::new(year_header).strong())
                .id_salt("year_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_years();
                    }
                    for year in &years {
                        let mut checked = state.selection.years.contains(year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(*year);
                        }
                    }
                });

            // ---- State multi-select ----
            let n_states = state.selection.states.len();
            let state_header = if n_states == 0 {
                format!("State  (all {})", codes.len())
            } else {
                format!("State  ({n_states}/{})", codes.len())
            };
            egui::CollapsingHeader::new(RichText::new(state_header).strong())
                .id_salt("state_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_states();
                    }
                    for code in &codes {
                        let mut checked = state.selection.states.contains(code);
                        if ui.checkbox(&mut checked, code.as_str()).changed() {
                            state.toggle_state(code);
                        }
                    }
                });

            ui.separator();
            summary_block(ui, state);
        });
}

/// The "Summary statistics" block.  Hidden entirely when the filtered view
/// is empty — no zero totals over nothing.
fn summary_block(ui: &mut Ui, state: &AppState) {
    let Some(totals) = &state.totals else {
        return;
    };

    ui.heading("Summary statistics");
    for metric in Metric::ALL {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(metric.label());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.strong(format_metric(metric, totals));
            });
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open report…").clicked() {
                open_report_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open geography…").clicked() {
                open_geography_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open soy report")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records covering {} states and {} years",
                    dataset.len(),
                    dataset.state_codes.len(),
                    dataset.years.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load report: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn open_geography_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open geography reference")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match Geography::load(&path) {
            Ok(geography) => {
                log::info!("Loaded geography with {} states", geography.states.len());
                state.set_geography(geography);
            }
            Err(e) => {
                log::error!("Failed to load geography: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
