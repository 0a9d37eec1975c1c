use crate::data::model::{Metric, MetricTotals};

// ---------------------------------------------------------------------------
// Grouped number formatting (pt-BR separators)
// ---------------------------------------------------------------------------

/// Format a value with a fixed number of decimals, `.` as the thousands
/// separator and `,` as the decimal mark — the `{:,.2}`-style rendering with
/// the two symbols swapped.  Display-only: aggregation always runs on the
/// raw values.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format one metric of a totals tuple with its own decimal count and unit,
/// e.g. `"1.234,56 (ha)"`.
pub fn format_metric(metric: Metric, totals: &MetricTotals) -> String {
    format!(
        "{}{}",
        format_grouped(metric.of(totals), metric.decimals()),
        metric.unit()
    )
}

/// The four labelled lines shown in a state's map tooltip.
pub fn tooltip_lines(state_code: &str, totals: &MetricTotals) -> [String; 5] {
    [
        state_code.to_string(),
        format!("Soy: {}", format_metric(Metric::SoyArea, totals)),
        format!("Carbon on soil: {}", format_metric(Metric::CarbonOnSoil, totals)),
        format!(
            "Legal reserve surplus: {}",
            format_metric(Metric::LegalReserveSurplus, totals)
        ),
        format!(
            "Active CARs: {}",
            format_metric(Metric::ActiveRegistrations, totals)
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dot_and_decimal_comma() {
        assert_eq!(format_grouped(1234567.891, 2), "1.234.567,89");
        assert_eq!(format_grouped(1000.0, 2), "1.000,00");
    }

    #[test]
    fn small_values_have_no_grouping() {
        assert_eq!(format_grouped(0.0, 2), "0,00");
        assert_eq!(format_grouped(999.9, 2), "999,90");
    }

    #[test]
    fn zero_decimals_drops_the_mark() {
        assert_eq!(format_grouped(12345.0, 0), "12.345");
        assert_eq!(format_grouped(7.0, 0), "7");
    }

    #[test]
    fn negative_values_keep_the_sign_outside_grouping() {
        assert_eq!(format_grouped(-1234.5, 2), "-1.234,50");
        assert_eq!(format_grouped(-12.0, 0), "-12");
    }

    #[test]
    fn metric_labels_carry_units_and_decimals() {
        let totals = MetricTotals {
            soy_area_undeforested: 1234.5,
            carbon_on_soil: 10.0,
            legal_reserve_surplus: 5.25,
            active_registrations: 1234,
        };
        assert_eq!(format_metric(Metric::SoyArea, &totals), "1.234,50 (ha)");
        assert_eq!(format_metric(Metric::CarbonOnSoil, &totals), "10,00 (ton)");
        assert_eq!(
            format_metric(Metric::ActiveRegistrations, &totals),
            "1.234"
        );
    }

    #[test]
    fn tooltip_has_all_four_metrics() {
        let totals = MetricTotals::default();
        let lines = tooltip_lines("MT", &totals);
        assert_eq!(lines[0], "MT");
        assert_eq!(lines[1], "Soy: 0,00 (ha)");
        assert_eq!(lines[4], "Active CARs: 0");
    }
}
