use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::color::ColorRamp;
use crate::data::aggregate::{aggregate_by_state, summary_totals};
use crate::data::filter::{FilterSelection, filtered_indices};
use crate::data::model::{Metric, MetricTotals, SoyDataset};
use crate::geo::Geography;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The derived fields (`visible_indices`, `state_metrics`, `totals`, `ramp`)
/// are an explicit cache over (dataset, geography, selection), rebuilt by
/// [`AppState::refilter`] whenever an input changes.  Recomputation is
/// idempotent and needs no UI harness.
pub struct AppState {
    /// Loaded report (None until a file loads successfully).
    pub dataset: Option<SoyDataset>,

    /// Loaded geography reference (None until loaded).
    pub geography: Option<Geography>,

    /// The user's year/state selections.  Empty set = no filter.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection, in file order.
    pub visible_indices: Vec<usize>,

    /// Per-state metric sums over the visible rows, zero-filled for every
    /// state the geography knows.
    pub state_metrics: BTreeMap<String, MetricTotals>,

    /// Grand totals over the visible rows; None when the view is empty.
    pub totals: Option<MetricTotals>,

    /// Which metric drives the map fill.
    pub color_metric: Metric,

    /// Ramp over the per-state values of `color_metric`.
    pub ramp: Option<ColorRamp>,

    /// Legend image shown beneath the map, if the file exists.
    pub legend_image: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            geography: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            state_metrics: BTreeMap::new(),
            totals: None,
            color_metric: Metric::SoyArea,
            ramp: None,
            legend_image: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded report and reset the selection.
    pub fn set_dataset(&mut self, dataset: SoyDataset) {
        self.selection = FilterSelection::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Ingest a newly loaded geography reference.
    pub fn set_geography(&mut self, geography: Geography) {
        self.geography = Some(geography);
        self.refilter();
    }

    /// Rebuild every derived field from (dataset, geography, selection).
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.visible_indices.clear();
            self.state_metrics.clear();
            self.totals = None;
            self.ramp = None;
            return;
        };

        self.visible_indices = filtered_indices(dataset, &self.selection);

        let reference_codes: Vec<String> = self
            .geography
            .as_ref()
            .map(|g| g.state_codes().into_iter().collect())
            .unwrap_or_default();
        self.state_metrics = aggregate_by_state(
            dataset,
            &self.visible_indices,
            reference_codes.iter().map(String::as_str),
        );

        self.totals = summary_totals(dataset, &self.visible_indices);
        self.rebuild_ramp();
    }

    /// Rebuild the color ramp over the current per-state values.
    fn rebuild_ramp(&mut self) {
        let metric = self.color_metric;
        self.ramp = if self.state_metrics.is_empty() {
            None
        } else {
            Some(ColorRamp::from_values(
                self.state_metrics.values().map(|m| metric.of(m)),
            ))
        };
    }

    /// Switch the metric driving the map fill.
    pub fn set_color_metric(&mut self, metric: Metric) {
        self.color_metric = metric;
        self.rebuild_ramp();
    }

    /// Toggle one year in the selection and recompute.
    pub fn toggle_year(&mut self, year: i32) {
        self.selection.toggle_year(year);
        self.refilter();
    }

    /// Toggle one state code in the selection and recompute.
    pub fn toggle_state(&mut self, code: &str) {
        self.selection.toggle_state(code);
        self.refilter();
    }

    /// Clear the year filter (back to "all years").
    pub fn clear_years(&mut self) {
        self.selection.years.clear();
        self.refilter();
    }

    /// Clear the state filter (back to "all states").
    pub fn clear_states(&mut self) {
        self.selection.states.clear();
        self.refilter();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StateRecord;

    fn record(state: &str, year: i32, soy: f64) -> StateRecord {
        StateRecord {
            state_code: state.to_string(),
            year,
            soy_area_undeforested: soy,
            carbon_on_soil: 1.0,
            legal_reserve_surplus: 1.0,
            active_registrations: 1,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(SoyDataset::from_records(vec![
            record("MT", 2020, 100.0),
            record("MT", 2021, 50.0),
            record("PA", 2020, 30.0),
        ]));
        state
    }

    #[test]
    fn fresh_dataset_shows_everything() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.totals.unwrap().soy_area_undeforested, 180.0);
    }

    #[test]
    fn toggling_a_year_narrows_the_view() {
        let mut state = loaded_state();
        state.toggle_year(2020);
        assert_eq!(state.visible_indices, vec![0, 2]);
        assert_eq!(state.state_metrics["MT"].soy_area_undeforested, 100.0);

        state.toggle_year(2020);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_view_suppresses_totals() {
        let mut state = loaded_state();
        state.toggle_year(2021);
        state.toggle_state("PA");
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.totals, None);
    }

    #[test]
    fn geography_codes_are_zero_filled_into_aggregates() {
        let mut state = loaded_state();
        state.set_geography(
            Geography::from_geojson_str(
                r#"{
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": { "sigla_uf": "AM" },
                        "geometry": {
                            "type": "Polygon",
                            "coordinates": [[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]
                        }
                    }]
                }"#,
            )
            .unwrap(),
        );
        assert_eq!(state.state_metrics["AM"], MetricTotals::default());
        assert_eq!(state.state_metrics["MT"].soy_area_undeforested, 150.0);
    }

    #[test]
    fn refilter_is_idempotent() {
        let mut state = loaded_state();
        state.toggle_state("MT");
        let before = (
            state.visible_indices.clone(),
            state.state_metrics.clone(),
            state.totals,
        );
        state.refilter();
        assert_eq!(before.0, state.visible_indices);
        assert_eq!(before.1, state.state_metrics);
        assert_eq!(before.2, state.totals);
    }
}
