use crate::error::{DashboardError, Result};
use crate::utils::parse_month_label;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// Variants are declared in label order so derived `Ord` matches sorting by label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum ReconciliationStatus {
    #[schemars(description = "Billed charges have been matched against expected charges")]
    Completed,

    #[serde(rename = "In Progress")]
    #[schemars(description = "Matching of billed vs. expected charges has started but is not finished")]
    InProgress,

    #[schemars(description = "Matching has not started")]
    Pending,
}

impl ReconciliationStatus {
    /// Candidate order used when drawing a status.
    pub const DRAW_ORDER: [ReconciliationStatus; 3] = [Self::Pending, Self::Completed, Self::InProgress];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum DisputeType {
    #[serde(rename = "Rate Dispute")]
    #[schemars(description = "The billed rate differs from the contracted rate")]
    RateDispute,

    #[serde(rename = "Volume Dispute")]
    #[schemars(description = "The billed traffic volume differs from the measured volume")]
    VolumeDispute,
}

impl DisputeType {
    pub const DRAW_ORDER: [DisputeType; 2] = [Self::RateDispute, Self::VolumeDispute];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RateDispute => "Rate Dispute",
            Self::VolumeDispute => "Volume Dispute",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum SettlementStatus {
    #[schemars(description = "The dispute resolution has been financially closed (always the case for undisputed invoices)")]
    Settled,

    #[schemars(description = "The dispute is still financially open")]
    Unsettled,
}

impl SettlementStatus {
    pub const DRAW_ORDER: [SettlementStatus; 2] = [Self::Settled, Self::Unsettled];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Settled => "Settled",
            Self::Unsettled => "Unsettled",
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DisputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One invoice for a single carrier and month.
///
/// A record is disputed exactly when `dispute_type` is set. Undisputed records have
/// `disputed_amount_usd == 0.0` and `settlement_status == Settled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BillingRecord {
    #[serde(rename = "Carrier Name")]
    pub carrier_name: String,

    #[serde(rename = "Invoice Amount (USD)")]
    pub invoice_amount_usd: f64,

    #[serde(rename = "Disputed Amount (USD)")]
    pub disputed_amount_usd: f64,

    #[serde(rename = "Reconciliation Status")]
    pub reconciliation_status: ReconciliationStatus,

    #[serde(rename = "Dispute Type")]
    pub dispute_type: Option<DisputeType>,

    #[serde(rename = "Settlement Status")]
    pub settlement_status: SettlementStatus,

    #[serde(rename = "Invoice Month")]
    #[schemars(description = "Calendar month of the invoice in YYYY-MM format")]
    pub invoice_month: String,
}

impl BillingRecord {
    pub fn is_disputed(&self) -> bool {
        self.dispute_type.is_some()
    }

    /// Checks the dispute amount and settlement fields against `max_dispute_ratio`.
    pub fn satisfies_dispute_contract(&self, max_dispute_ratio: f64) -> bool {
        if self.is_disputed() {
            self.disputed_amount_usd >= 0.0
                && self.disputed_amount_usd < max_dispute_ratio * self.invoice_amount_usd
        } else {
            self.disputed_amount_usd == 0.0
                && self.settlement_status == SettlementStatus::Settled
        }
    }
}

/// Upper bound on `carrier_count`.
pub const MAX_CARRIER_COUNT: u32 = 1_000;

/// Upper bound on `month_count` (50 years).
pub const MAX_MONTH_COUNT: u32 = 600;

fn default_seed() -> u64 {
    42
}

fn default_carrier_count() -> u32 {
    10
}

fn default_carrier_prefix() -> String {
    "Carrier".to_string()
}

fn default_start_month() -> String {
    "2024-01".to_string()
}

fn default_month_count() -> u32 {
    12
}

fn default_invoice_min() -> f64 {
    1000.0
}

fn default_invoice_max() -> f64 {
    5000.0
}

fn default_dispute_probability() -> f64 {
    0.2
}

fn default_max_dispute_ratio() -> f64 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorConfig {
    #[serde(default = "default_seed")]
    #[schemars(description = "Seed for the pseudo-random stream. The same seed always yields the same dataset.")]
    pub seed: u64,

    #[serde(default = "default_carrier_count")]
    #[schemars(description = "Number of carriers, labelled '<prefix> 1' through '<prefix> N'")]
    pub carrier_count: u32,

    #[serde(default = "default_carrier_prefix")]
    pub carrier_prefix: String,

    #[serde(default = "default_start_month")]
    #[schemars(description = "First invoice month in YYYY-MM format")]
    pub start_month: String,

    #[serde(default = "default_month_count")]
    #[schemars(description = "Number of consecutive calendar months to generate")]
    pub month_count: u32,

    #[serde(default = "default_invoice_min")]
    #[schemars(description = "Inclusive lower bound of the invoice amount in USD")]
    pub invoice_min_usd: f64,

    #[serde(default = "default_invoice_max")]
    #[schemars(description = "Exclusive upper bound of the invoice amount in USD")]
    pub invoice_max_usd: f64,

    #[serde(default = "default_dispute_probability")]
    #[schemars(description = "Probability that an invoice is disputed (0.0 to 1.0)")]
    pub dispute_probability: f64,

    #[serde(default = "default_max_dispute_ratio")]
    #[schemars(description = "Disputed amounts are drawn from [0, ratio * invoice amount)")]
    pub max_dispute_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            carrier_count: default_carrier_count(),
            carrier_prefix: default_carrier_prefix(),
            start_month: default_start_month(),
            month_count: default_month_count(),
            invoice_min_usd: default_invoice_min(),
            invoice_max_usd: default_invoice_max(),
            dispute_probability: default_dispute_probability(),
            max_dispute_ratio: default_max_dispute_ratio(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn carrier_labels(&self) -> Vec<String> {
        (1..=self.carrier_count)
            .map(|i| format!("{} {}", self.carrier_prefix, i))
            .collect()
    }

    /// Number of records a generator built from this config produces.
    ///
    /// Bounded by `MAX_CARRIER_COUNT * MAX_MONTH_COUNT` once [`validate`](Self::validate) passes.
    pub fn expected_record_count(&self) -> usize {
        self.carrier_count as usize * self.month_count as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.carrier_count == 0 {
            return Err(DashboardError::InvalidConfig(
                "carrier_count must be at least 1".to_string(),
            ));
        }

        if self.month_count == 0 {
            return Err(DashboardError::InvalidConfig(
                "month_count must be at least 1".to_string(),
            ));
        }

        if self.carrier_count > MAX_CARRIER_COUNT {
            return Err(DashboardError::InvalidConfig(format!(
                "carrier_count {} exceeds the maximum of {}",
                self.carrier_count, MAX_CARRIER_COUNT
            )));
        }

        if self.month_count > MAX_MONTH_COUNT {
            return Err(DashboardError::InvalidConfig(format!(
                "month_count {} exceeds the maximum of {}",
                self.month_count, MAX_MONTH_COUNT
            )));
        }

        if self.carrier_prefix.trim().is_empty() {
            return Err(DashboardError::InvalidConfig(
                "carrier_prefix must not be empty".to_string(),
            ));
        }

        parse_month_label(&self.start_month)?;

        if !self.invoice_min_usd.is_finite()
            || !self.invoice_max_usd.is_finite()
            || self.invoice_min_usd <= 0.0
            || self.invoice_min_usd >= self.invoice_max_usd
        {
            return Err(DashboardError::InvalidConfig(format!(
                "invoice range [{}, {}) must be finite, positive and non-empty",
                self.invoice_min_usd, self.invoice_max_usd
            )));
        }

        if !(0.0..=1.0).contains(&self.dispute_probability) {
            return Err(DashboardError::InvalidConfig(format!(
                "dispute_probability {} must be between 0.0 and 1.0",
                self.dispute_probability
            )));
        }

        if !(self.max_dispute_ratio > 0.0 && self.max_dispute_ratio <= 1.0) {
            return Err(DashboardError::InvalidConfig(format!(
                "max_dispute_ratio {} must be in (0.0, 1.0]",
                self.max_dispute_ratio
            )));
        }

        // The disputed-amount range [0, invoice * ratio) must be non-empty for every invoice.
        let smallest_dispute_cap = self.invoice_min_usd * self.max_dispute_ratio;
        if !(smallest_dispute_cap > 0.0) {
            return Err(DashboardError::InvalidConfig(format!(
                "invoice_min_usd {} times max_dispute_ratio {} underflows to zero",
                self.invoice_min_usd, self.max_dispute_ratio
            )));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(GeneratorConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.expected_record_count(), 120);
    }

    #[test]
    fn test_carrier_labels() {
        let labels = GeneratorConfig::default().carrier_labels();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "Carrier 1");
        assert_eq!(labels[9], "Carrier 10");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GeneratorConfig::from_json(r#"{"seed": 7, "month_count": 3}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.month_count, 3);
        assert_eq!(config.carrier_count, 10);
        assert_eq!(config.start_month, "2024-01");
    }

    #[test]
    fn test_from_json_rejects_invalid_probability() {
        let result = GeneratorConfig::from_json(r#"{"dispute_probability": 1.5}"#);
        assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GeneratorConfig::default();
        config.invoice_min_usd = 5000.0;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.start_month = "2024-13".to_string();
        assert!(matches!(config.validate(), Err(DashboardError::DateError(_))));

        let mut config = GeneratorConfig::default();
        config.carrier_count = 0;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.max_dispute_ratio = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_subnormal_invoice_range() {
        let config = GeneratorConfig {
            invoice_min_usd: 5e-324,
            invoice_max_usd: 1e-323,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DashboardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_counts() {
        let result = GeneratorConfig::from_json(
            r#"{"carrier_count": 4294967295, "month_count": 4294967295}"#,
        );
        assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));

        let config = GeneratorConfig {
            carrier_count: MAX_CARRIER_COUNT + 1,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            month_count: MAX_MONTH_COUNT + 1,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            carrier_count: MAX_CARRIER_COUNT,
            month_count: MAX_MONTH_COUNT,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.expected_record_count(), 600_000);
    }

    #[test]
    fn test_status_labels_sort_like_strings() {
        let mut statuses = ReconciliationStatus::DRAW_ORDER.to_vec();
        statuses.sort();
        let labels: Vec<&str> = statuses.iter().map(|s| s.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_record_serializes_with_column_labels() {
        let record = BillingRecord {
            carrier_name: "Carrier 1".to_string(),
            invoice_amount_usd: 1500.0,
            disputed_amount_usd: 100.0,
            reconciliation_status: ReconciliationStatus::InProgress,
            dispute_type: Some(DisputeType::VolumeDispute),
            settlement_status: SettlementStatus::Unsettled,
            invoice_month: "2024-03".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Carrier Name\":\"Carrier 1\""));
        assert!(json.contains("\"In Progress\""));
        assert!(json.contains("\"Volume Dispute\""));
        assert!(!json.contains("Is Disputed"));
        assert!(record.is_disputed());

        let back: BillingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_schema_generation() {
        let schema = GeneratorConfig::generate_json_schema();
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("dispute_probability"));
        assert!(json.contains("start_month"));
    }
}
