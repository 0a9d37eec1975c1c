use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::format::format_grouped;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filtered-rows table (bottom panel)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 6] = [
    "State",
    "Year",
    "Soy (ha)",
    "Carbon (ton)",
    "LR surplus (ha)",
    "Active CARs",
];

/// Render the filtered records as a table, in file order.
pub fn rows_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("No report loaded.");
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::remainder())
        .column(Column::remainder())
        .column(Column::remainder())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &dataset.records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.state_code);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.year.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_grouped(rec.soy_area_undeforested, 2));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_grouped(rec.carbon_on_soil, 2));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_grouped(rec.legal_reserve_surplus, 2));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_grouped(rec.active_registrations as f64, 0));
                });
            });
        });
}
