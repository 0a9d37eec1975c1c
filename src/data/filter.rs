use std::collections::BTreeSet;

use super::model::SoyDataset;

// ---------------------------------------------------------------------------
// Filter selection: which years and states the user picked
// ---------------------------------------------------------------------------

/// The user's current filter choices.  An empty set means "no filter"
/// (include everything), never "include nothing" — this mirrors leaving a
/// multi-select untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub states: BTreeSet<String>,
}

impl FilterSelection {
    /// True when neither filter is active.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.states.is_empty()
    }

    /// Toggle a year in or out of the selection.
    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }

    /// Toggle a state code in or out of the selection.
    pub fn toggle_state(&mut self, code: &str) {
        if !self.states.remove(code) {
            self.states.insert(code.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of records that pass the current selection.
///
/// A record passes when:
/// * the year set is empty, or contains the record's year, AND
/// * the state set is empty, or contains the record's state code.
///
/// Output preserves input order; no re-sorting.
pub fn filtered_indices(dataset: &SoyDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            (selection.years.is_empty() || selection.years.contains(&rec.year))
                && (selection.states.is_empty() || selection.states.contains(&rec.state_code))
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StateRecord;

    fn record(state: &str, year: i32) -> StateRecord {
        StateRecord {
            state_code: state.to_string(),
            year,
            soy_area_undeforested: 1.0,
            carbon_on_soil: 1.0,
            legal_reserve_surplus: 1.0,
            active_registrations: 1,
        }
    }

    fn dataset() -> SoyDataset {
        SoyDataset::from_records(vec![
            record("MT", 2020),
            record("MT", 2021),
            record("PA", 2020),
            record("GO", 2022),
        ])
    }

    #[test]
    fn empty_selection_includes_everything() {
        let ds = dataset();
        let indices = filtered_indices(&ds, &FilterSelection::default());
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn year_filter_keeps_only_selected_years() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.years.insert(2020);
        let indices = filtered_indices(&ds, &sel);
        assert_eq!(indices, vec![0, 2]);
        assert!(indices.iter().all(|&i| ds.records[i].year == 2020));
    }

    #[test]
    fn state_filter_keeps_only_selected_states() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.states.insert("MT".to_string());
        let indices = filtered_indices(&ds, &sel);
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn both_filters_combine_with_and() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.years.insert(2020);
        sel.states.insert("PA".to_string());
        let indices = filtered_indices(&ds, &sel);
        assert_eq!(indices, vec![2]);
    }

    #[test]
    fn no_matching_rows_gives_empty_view() {
        let ds = dataset();
        let mut sel = FilterSelection::default();
        sel.years.insert(2021);
        sel.states.insert("PA".to_string());
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn output_preserves_input_order() {
        // Records deliberately not sorted by state or year.
        let ds = SoyDataset::from_records(vec![
            record("PA", 2021),
            record("MT", 2020),
            record("PA", 2020),
        ]);
        let mut sel = FilterSelection::default();
        sel.states.insert("PA".to_string());
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 2]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = FilterSelection::default();
        sel.toggle_year(2020);
        assert!(sel.years.contains(&2020));
        sel.toggle_year(2020);
        assert!(sel.years.is_empty());
        sel.toggle_state("MT");
        assert!(sel.states.contains("MT"));
        sel.toggle_state("MT");
        assert!(sel.is_empty());
    }
}
