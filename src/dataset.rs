use crate::error::Result;
use crate::filter::{apply_filters, FilteredView, Selector, ALL_SENTINEL};
use crate::generator::RecordGenerator;
use crate::schema::{BillingRecord, GeneratorConfig};
use crate::utils::distinct_in_order;
use log::info;
use serde::{Deserialize, Serialize};

/// The immutable base table for one session.
///
/// Each session owns its own copy; filtering always returns a new [`FilteredView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingDataset {
    config: GeneratorConfig,
    records: Vec<BillingRecord>,
}

impl BillingDataset {
    pub fn generate(config: GeneratorConfig) -> Result<Self> {
        info!(
            "Generating billing dataset: seed {}, {} carriers, {} months from {}",
            config.seed, config.carrier_count, config.month_count, config.start_month
        );

        let records = RecordGenerator::new(config.clone())?.generate();
        Ok(Self { config, records })
    }

    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::generate(GeneratorConfig::with_seed(seed))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn distinct_carriers(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.carrier_name.as_str()))
    }

    pub fn distinct_months(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.invoice_month.as_str()))
    }

    /// Choices for the carrier control: `"All"` followed by the carriers in first-appearance order.
    pub fn carrier_options(&self) -> Vec<String> {
        with_all_sentinel(self.distinct_carriers())
    }

    /// Choices for the month control: `"All"` followed by the months in first-appearance order.
    ///
    /// Generated tables are month-major, so for them this is also calendar order.
    pub fn month_options(&self) -> Vec<String> {
        with_all_sentinel(self.distinct_months())
    }

    pub fn filter(&self, carrier: &Selector, month: &Selector) -> Result<FilteredView> {
        apply_filters(&self.records, carrier, month)
    }
}

fn with_all_sentinel(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL_SENTINEL.to_string())
        .chain(values)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_start_with_all() {
        let dataset = BillingDataset::with_seed(42).unwrap();

        let carriers = dataset.carrier_options();
        assert_eq!(carriers.len(), 11);
        assert_eq!(carriers[0], "All");
        assert_eq!(carriers[1], "Carrier 1");
        assert_eq!(carriers[10], "Carrier 10");

        let months = dataset.month_options();
        assert_eq!(months.len(), 13);
        assert_eq!(months[0], "All");
        assert_eq!(months[1], "2024-01");
        assert_eq!(months[12], "2024-12");
    }

    #[test]
    fn test_month_options_follow_generated_order() {
        let config = GeneratorConfig {
            start_month: "2024-11".to_string(),
            month_count: 3,
            carrier_count: 2,
            ..GeneratorConfig::default()
        };
        let dataset = BillingDataset::generate(config).unwrap();

        assert_eq!(dataset.month_options(), vec!["All", "2024-11", "2024-12", "2025-01"]);
        assert_eq!(&dataset.month_options()[1..], dataset.distinct_months().as_slice());
    }

    #[test]
    fn test_filter_leaves_base_table_untouched() {
        let dataset = BillingDataset::with_seed(42).unwrap();
        let before = dataset.clone();

        let view = dataset
            .filter(&"Carrier 2".into(), &"2024-03".into())
            .unwrap();
        assert_eq!(view.len(), 1);

        assert!(dataset.filter(&"Nope".into(), &Selector::All).is_err());
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = BillingDataset::with_seed(42).unwrap();
        let b = BillingDataset::with_seed(42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 120);
        assert!(!a.is_empty());
    }
}
