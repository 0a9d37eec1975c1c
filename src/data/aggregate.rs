use std::collections::BTreeMap;

use super::model::{MetricTotals, SoyDataset};

// ---------------------------------------------------------------------------
// Per-state aggregation (map annotation)
// ---------------------------------------------------------------------------

/// Sum the four metrics per state across the filtered view.
///
/// Every code in `reference_codes` (the geography file) gets an entry, zero
/// when the state has no rows in the view, so the map can draw every region.
/// States that appear in the view but not in the geography are kept too —
/// a code mismatch is a default-fill situation, not an error.
pub fn aggregate_by_state<'a>(
    dataset: &SoyDataset,
    indices: &[usize],
    reference_codes: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, MetricTotals> {
    let mut by_state: BTreeMap<String, MetricTotals> = reference_codes
        .into_iter()
        .map(|code| (code.to_string(), MetricTotals::default()))
        .collect();

    for &idx in indices {
        let rec = &dataset.records[idx];
        by_state
            .entry(rec.state_code.clone())
            .or_default()
            .accumulate(rec);
    }

    by_state
}

// ---------------------------------------------------------------------------
// Summary totals (side panel)
// ---------------------------------------------------------------------------

/// Grand total of each metric across all rows of the view, or `None` when
/// the view is empty.  The summary panel is suppressed entirely on empty
/// input rather than showing zeros.
pub fn summary_totals(dataset: &SoyDataset, indices: &[usize]) -> Option<MetricTotals> {
    if indices.is_empty() {
        return None;
    }
    let mut totals = MetricTotals::default();
    for &idx in indices {
        totals.accumulate(&dataset.records[idx]);
    }
    Some(totals)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSelection, filtered_indices};
    use crate::data::model::StateRecord;

    fn record(state: &str, year: i32, soy: f64, carbon: f64, surplus: f64, cars: i64) -> StateRecord {
        StateRecord {
            state_code: state.to_string(),
            year,
            soy_area_undeforested: soy,
            carbon_on_soil: carbon,
            legal_reserve_surplus: surplus,
            active_registrations: cars,
        }
    }

    fn dataset() -> SoyDataset {
        SoyDataset::from_records(vec![
            record("MT", 2020, 100.0, 10.0, 5.0, 2),
            record("MT", 2021, 50.0, 5.0, 2.0, 1),
            record("PA", 2020, 30.0, 3.0, 1.0, 1),
        ])
    }

    #[test]
    fn duplicate_state_rows_sum() {
        let ds = dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let by_state = aggregate_by_state(&ds, &all, []);
        let mt = &by_state["MT"];
        assert_eq!(mt.soy_area_undeforested, 150.0);
        assert_eq!(mt.carbon_on_soil, 15.0);
        assert_eq!(mt.legal_reserve_surplus, 7.0);
        assert_eq!(mt.active_registrations, 3);
    }

    #[test]
    fn reference_state_without_rows_is_zero_filled() {
        let ds = dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let by_state = aggregate_by_state(&ds, &all, ["MT", "PA", "AM"]);
        assert_eq!(by_state["AM"], MetricTotals::default());
        // Still drawn, not absent.
        assert!(by_state.contains_key("AM"));
    }

    #[test]
    fn view_state_missing_from_geography_is_kept() {
        let ds = dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let by_state = aggregate_by_state(&ds, &all, ["MT"]);
        assert!(by_state.contains_key("PA"));
        assert_eq!(by_state["PA"].soy_area_undeforested, 30.0);
    }

    #[test]
    fn totals_match_sum_of_per_state_aggregates() {
        let ds = dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let by_state = aggregate_by_state(&ds, &all, ["MT", "PA", "AM"]);
        let totals = summary_totals(&ds, &all).unwrap();

        let soy_sum: f64 = by_state.values().map(|m| m.soy_area_undeforested).sum();
        let cars_sum: i64 = by_state.values().map(|m| m.active_registrations).sum();
        assert_eq!(totals.soy_area_undeforested, soy_sum);
        assert_eq!(totals.active_registrations, cars_sum);
    }

    #[test]
    fn empty_view_suppresses_totals() {
        let ds = dataset();
        assert_eq!(summary_totals(&ds, &[]), None);
    }

    #[test]
    fn worked_example_year_2020() {
        // Rows [(MT,2020,100,10,5,2), (MT,2021,50,5,2,1), (PA,2020,30,3,1,1)],
        // years = {2020}.
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.years.insert(2020);
        let indices = filtered_indices(&ds, &sel);
        assert_eq!(indices.len(), 2);

        let by_state = aggregate_by_state(&ds, &indices, []);
        let mt = &by_state["MT"];
        assert_eq!(
            (
                mt.soy_area_undeforested,
                mt.carbon_on_soil,
                mt.legal_reserve_surplus,
                mt.active_registrations
            ),
            (100.0, 10.0, 5.0, 2)
        );

        let totals = summary_totals(&ds, &indices).unwrap();
        assert_eq!(totals.soy_area_undeforested, 130.0);
        assert_eq!(totals.carbon_on_soil, 13.0);
        assert_eq!(totals.legal_reserve_surplus, 6.0);
        assert_eq!(totals.active_registrations, 3);
    }
}
