use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StateRecord – one row of the soy report
// ---------------------------------------------------------------------------

/// One (state, year) observation from the soy report.
///
/// Serde renames bind the fields to the report's column headers, so the
/// loader never depends on column position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Two-letter federative-unit code, e.g. "MT".
    #[serde(rename = "sigla_uf")]
    pub state_code: String,
    pub year: i32,
    /// Soy area grown on land that was never deforested (hectares).
    #[serde(rename = "soja_area_nao_desmat")]
    pub soy_area_undeforested: f64,
    /// Carbon stored in soil (tons CO2-equivalent).
    #[serde(rename = "tco2eq")]
    pub carbon_on_soil: f64,
    /// Native vegetation held beyond the legal minimum (hectares).
    #[serde(rename = "lr_surplus")]
    pub legal_reserve_surplus: f64,
    /// Count of active CAR registrations.
    #[serde(rename = "qtd_cars")]
    pub active_registrations: i64,
}

// ---------------------------------------------------------------------------
// MetricTotals – the four metrics summed over some set of rows
// ---------------------------------------------------------------------------

/// Sums of the four report metrics over a group of records (one state, or
/// the whole filtered view).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricTotals {
    pub soy_area_undeforested: f64,
    pub carbon_on_soil: f64,
    pub legal_reserve_surplus: f64,
    pub active_registrations: i64,
}

impl MetricTotals {
    /// Fold one record into the running totals.
    pub fn accumulate(&mut self, record: &StateRecord) {
        self.soy_area_undeforested += record.soy_area_undeforested;
        self.carbon_on_soil += record.carbon_on_soil;
        self.legal_reserve_surplus += record.legal_reserve_surplus;
        self.active_registrations += record.active_registrations;
    }
}

// ---------------------------------------------------------------------------
// Metric – names the four metrics for selectors and labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SoyArea,
    CarbonOnSoil,
    LegalReserveSurplus,
    ActiveRegistrations,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::SoyArea,
        Metric::CarbonOnSoil,
        Metric::LegalReserveSurplus,
        Metric::ActiveRegistrations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::SoyArea => "Soy",
            Metric::CarbonOnSoil => "Carbon on soil",
            Metric::LegalReserveSurplus => "Legal reserve surplus",
            Metric::ActiveRegistrations => "Active CARs",
        }
    }

    /// Unit suffix for display labels; empty for plain counts.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::SoyArea | Metric::LegalReserveSurplus => " (ha)",
            Metric::CarbonOnSoil => " (ton)",
            Metric::ActiveRegistrations => "",
        }
    }

    /// Decimal places for display: two for continuous quantities, zero for
    /// registration counts.
    pub fn decimals(&self) -> usize {
        match self {
            Metric::ActiveRegistrations => 0,
            _ => 2,
        }
    }

    /// Read this metric out of a totals tuple.
    pub fn of(&self, totals: &MetricTotals) -> f64 {
        match self {
            Metric::SoyArea => totals.soy_area_undeforested,
            Metric::CarbonOnSoil => totals.carbon_on_soil,
            Metric::LegalReserveSurplus => totals.legal_reserve_surplus,
            Metric::ActiveRegistrations => totals.active_registrations as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// SoyDataset – the complete loaded report
// ---------------------------------------------------------------------------

/// The full parsed report with pre-computed filter domains.
#[derive(Debug, Clone)]
pub struct SoyDataset {
    /// All records, in file order.
    pub records: Vec<StateRecord>,
    /// Sorted unique years present in the report.
    pub years: BTreeSet<i32>,
    /// Sorted unique state codes present in the report.
    pub state_codes: BTreeSet<String>,
}

impl SoyDataset {
    /// Build the filter domains from the loaded records.
    pub fn from_records(records: Vec<StateRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut state_codes = BTreeSet::new();
        for rec in &records {
            years.insert(rec.year);
            state_codes.insert(rec.state_code.clone());
        }
        SoyDataset {
            records,
            years,
            state_codes,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
