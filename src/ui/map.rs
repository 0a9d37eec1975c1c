use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::data::model::Metric;
use crate::format::tooltip_lines;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth map (central panel)
// ---------------------------------------------------------------------------

/// Render the choropleth: one filled polygon set per state, colored by the
/// selected metric, with a hover tooltip carrying all four metrics.
pub fn choropleth(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a report to view the map  (File → Open report…)");
        });
        return;
    }

    // ---- Color-by selector ----
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Color by");
        let current = state.color_metric;
        egui::ComboBox::from_id_salt("color_by_metric")
            .selected_text(current.label())
            .show_ui(ui, |ui: &mut Ui| {
                for metric in Metric::ALL {
                    if ui
                        .selectable_label(current == metric, metric.label())
                        .clicked()
                    {
                        state.set_color_metric(metric);
                    }
                }
            });
    });

    let Some(geography) = &state.geography else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No geography loaded  (File → Open geography…)");
        });
        return;
    };

    let metric = state.color_metric;
    let hovered = Plot::new("choropleth")
        .data_aspect(1.0)
        .show_grid(false)
        .show_axes(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for shape in &geography.states {
                // Zero-filled for states with no data, so every region draws.
                let value = state
                    .state_metrics
                    .get(&shape.code)
                    .map(|m| metric.of(m))
                    .unwrap_or(0.0);
                let fill = state
                    .ramp
                    .map(|ramp| ramp.color_for(value))
                    .unwrap_or(Color32::GRAY);

                for ring in &shape.rings {
                    let points: PlotPoints = ring.iter().map(|&[lon, lat]| [lon, lat]).collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&shape.code),
                    );
                }
            }

            plot_ui
                .pointer_coordinate()
                .and_then(|p| geography.state_at(p.x, p.y))
                .map(|shape| shape.code.clone())
        })
        .inner;

    if let Some(code) = hovered {
        let totals = state.state_metrics.get(&code).copied().unwrap_or_default();
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            egui::Id::new("state_tooltip"),
            |ui: &mut Ui| {
                let [header, soy, carbon, surplus, cars] = tooltip_lines(&code, &totals);
                ui.strong(header);
                ui.label(soy);
                ui.label(carbon);
                ui.label(surplus);
                ui.label(cars);
            },
        );
    }
}

/// Render the static legend image beneath the map, when present.
pub fn legend_image(ui: &mut Ui, state: &AppState) {
    let Some(path) = &state.legend_image else {
        return;
    };
    ui.add(
        egui::Image::new(format!("file://{}", path.display()))
            .max_height(60.0)
            .max_width(ui.available_width()),
    );
}
