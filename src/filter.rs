use crate::error::{DashboardError, Result};
use crate::schema::BillingRecord;
use crate::utils::distinct_in_order;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const ALL_SENTINEL: &str = "All";

/// Fewer distinct carriers than this in a month-specific view raises an advisory.
pub const MIN_CARRIERS_PER_MONTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Selector {
    All,
    Exact(String),
}

impl Selector {
    /// `"All"` maps to [`Selector::All`]; anything else is an exact, case-sensitive match.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SENTINEL {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Exact(value) => value,
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal condition reported alongside (or instead of) computed results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The filtered view has no records; nothing is aggregated.
    EmptyResult,

    /// A specific month is selected but fewer than [`MIN_CARRIERS_PER_MONTH`] carriers remain.
    InsufficientCarrierCoverage { month: String, carriers: usize },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Self::EmptyResult => {
                "No data available for the selected filters. Please adjust your filters and try again."
                    .to_string()
            }
            Self::InsufficientCarrierCoverage { carriers, .. } => format!(
                "Only {} carrier(s) available for the selected month. Please adjust the filters for a better view.",
                carriers
            ),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// The records left after filtering, in base-table order. Never aliases the base table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredView {
    pub carrier_selector: Selector,
    pub month_selector: Selector,
    records: Vec<BillingRecord>,
    advisories: Vec<Advisory>,
}

impl FilteredView {
    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn distinct_carrier_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.carrier_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn has_insufficient_coverage(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, Advisory::InsufficientCarrierCoverage { .. }))
    }
}

fn validate_selector<'a, I>(field: &'static str, selector: &Selector, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let Selector::Exact(value) = selector else {
        return Ok(());
    };

    let available = distinct_in_order(values);
    if available.iter().any(|v| v == value) {
        return Ok(());
    }

    Err(DashboardError::InvalidSelector {
        field,
        value: value.clone(),
        available,
    })
}

/// Keeps the records matching every active selector.
///
/// `records` is treated as the base table: an exact selector whose value does not occur in
/// it is rejected with [`DashboardError::InvalidSelector`] instead of yielding an empty view.
pub fn apply_filters(
    records: &[BillingRecord],
    carrier_selector: &Selector,
    month_selector: &Selector,
) -> Result<FilteredView> {
    validate_selector(
        "carrier",
        carrier_selector,
        records.iter().map(|r| r.carrier_name.as_str()),
    )?;
    validate_selector(
        "month",
        month_selector,
        records.iter().map(|r| r.invoice_month.as_str()),
    )?;

    let filtered: Vec<BillingRecord> = records
        .iter()
        .filter(|r| carrier_selector.matches(&r.carrier_name))
        .filter(|r| month_selector.matches(&r.invoice_month))
        .cloned()
        .collect();

    let mut view = FilteredView {
        carrier_selector: carrier_selector.clone(),
        month_selector: month_selector.clone(),
        records: filtered,
        advisories: Vec::new(),
    };

    debug!(
        "Filter carrier={} month={} kept {} of {} records",
        carrier_selector,
        month_selector,
        view.len(),
        records.len()
    );

    if view.is_empty() {
        view.advisories.push(Advisory::EmptyResult);
    } else if let Selector::Exact(month) = month_selector {
        let carriers = view.distinct_carrier_count();
        if carriers < MIN_CARRIERS_PER_MONTH {
            view.advisories.push(Advisory::InsufficientCarrierCoverage {
                month: month.clone(),
                carriers,
            });
        }
    }

    for advisory in &view.advisories {
        warn!("{}", advisory);
    }

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse("All"), Selector::All);
        assert_eq!(
            Selector::parse("all"),
            Selector::Exact("all".to_string())
        );
        assert!(Selector::parse("Carrier 1").matches("Carrier 1"));
        assert!(!Selector::parse("Carrier 1").matches("Carrier 10"));
        assert!(Selector::All.matches("anything"));
    }

    #[test]
    fn test_all_all_keeps_everything_in_order() {
        let records = generate(42);
        let view = apply_filters(&records, &Selector::All, &Selector::All).unwrap();

        assert_eq!(view.len(), 120);
        assert_eq!(view.records(), records.as_slice());
        assert!(view.advisories().is_empty());
    }

    #[test]
    fn test_carrier_filter() {
        let records = generate(42);
        let view = apply_filters(&records, &"Carrier 3".into(), &Selector::All).unwrap();

        assert_eq!(view.len(), 12);
        assert!(view.records().iter().all(|r| r.carrier_name == "Carrier 3"));

        let months: Vec<&str> = view.records().iter().map(|r| r.invoice_month.as_str()).collect();
        let mut sorted = months.clone();
        sorted.sort();
        assert_eq!(months, sorted);
    }

    #[test]
    fn test_month_filter_full_coverage_has_no_advisory() {
        let records = generate(42);
        let view = apply_filters(&records, &Selector::All, &"2024-05".into()).unwrap();

        assert_eq!(view.len(), 10);
        assert_eq!(view.distinct_carrier_count(), 10);
        assert!(!view.has_insufficient_coverage());
    }

    #[test]
    fn test_single_carrier_month_raises_coverage_advisory() {
        let records = generate(42);
        let view = apply_filters(&records, &"Carrier 1".into(), &"2024-01".into()).unwrap();

        assert_eq!(view.len(), 1);
        assert_eq!(
            view.advisories(),
            &[Advisory::InsufficientCarrierCoverage {
                month: "2024-01".to_string(),
                carriers: 1,
            }]
        );
    }

    #[test]
    fn test_carrier_only_filter_has_no_coverage_advisory() {
        let records = generate(42);
        let view = apply_filters(&records, &"Carrier 1".into(), &Selector::All).unwrap();
        assert!(view.advisories().is_empty());
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let records = generate(42);

        let err = apply_filters(&records, &"Carrier 11".into(), &Selector::All).unwrap_err();
        match err {
            DashboardError::InvalidSelector { field, value, available } => {
                assert_eq!(field, "carrier");
                assert_eq!(value, "Carrier 11");
                assert_eq!(available.len(), 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = apply_filters(&records, &Selector::All, &"2025-01".into()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidSelector { field: "month", .. }));

        // case-sensitive
        assert!(apply_filters(&records, &"carrier 1".into(), &Selector::All).is_err());
    }

    #[test]
    fn test_empty_base_table_yields_empty_result() {
        let view = apply_filters(&[], &Selector::All, &Selector::All).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.advisories(), &[Advisory::EmptyResult]);
    }

    #[test]
    fn test_advisory_messages() {
        let advisory = Advisory::InsufficientCarrierCoverage {
            month: "2024-01".to_string(),
            carriers: 2,
        };
        assert!(advisory.message().starts_with("Only 2 carrier(s)"));
        assert!(Advisory::EmptyResult.message().starts_with("No data available"));
    }
}
