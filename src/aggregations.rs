//! Group-by aggregations feeding the dashboard charts.
//!
//! Every function is pure over a slice of records. Rows come out sorted ascending by their
//! group key: carrier names and months compare as strings (so "Carrier 10" sorts before
//! "Carrier 2"), status and dispute-type keys compare by label. An empty input always
//! yields an empty `Vec`.

use crate::schema::{BillingRecord, DisputeType, ReconciliationStatus, SettlementStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AmountTotals {
    invoice: f64,
    disputed: f64,
}

impl AmountTotals {
    fn add(&mut self, record: &BillingRecord) {
        self.invoice += record.invoice_amount_usd;
        self.disputed += record.disputed_amount_usd;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CarrierTotals {
    #[serde(rename = "Carrier Name")]
    pub carrier_name: String,
    #[serde(rename = "Invoice Amount (USD)")]
    pub invoice_amount_usd: f64,
    #[serde(rename = "Disputed Amount (USD)")]
    pub disputed_amount_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyTotals {
    #[serde(rename = "Invoice Month")]
    pub invoice_month: String,
    #[serde(rename = "Invoice Amount (USD)")]
    pub invoice_amount_usd: f64,
    #[serde(rename = "Disputed Amount (USD)")]
    pub disputed_amount_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusTrendPoint {
    #[serde(rename = "Invoice Month")]
    pub invoice_month: String,
    #[serde(rename = "Reconciliation Status")]
    pub reconciliation_status: ReconciliationStatus,
    #[serde(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisputeTypeTotal {
    #[serde(rename = "Carrier Name")]
    pub carrier_name: String,
    #[serde(rename = "Dispute Type")]
    pub dispute_type: DisputeType,
    #[serde(rename = "Disputed Amount (USD)")]
    pub disputed_amount_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettlementDisputeTotal {
    #[serde(rename = "Carrier Name")]
    pub carrier_name: String,
    #[serde(rename = "Settlement Status")]
    pub settlement_status: SettlementStatus,
    #[serde(rename = "Disputed Amount (USD)")]
    pub disputed_amount_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettlementCount {
    #[serde(rename = "Settlement Status")]
    pub settlement_status: SettlementStatus,
    #[serde(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettlementInvoiceTotal {
    #[serde(rename = "Carrier Name")]
    pub carrier_name: String,
    #[serde(rename = "Settlement Status")]
    pub settlement_status: SettlementStatus,
    #[serde(rename = "Invoice Amount (USD)")]
    pub invoice_amount_usd: f64,
}

fn totals_by_carrier<'a, I>(records: I) -> Vec<CarrierTotals>
where
    I: IntoIterator<Item = &'a BillingRecord>,
{
    let mut groups: BTreeMap<&str, AmountTotals> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.carrier_name.as_str())
            .or_default()
            .add(record);
    }

    groups
        .into_iter()
        .map(|(carrier, totals)| CarrierTotals {
            carrier_name: carrier.to_string(),
            invoice_amount_usd: totals.invoice,
            disputed_amount_usd: totals.disputed,
        })
        .collect()
}

/// Invoice and disputed sums per carrier.
pub fn carrier_totals(records: &[BillingRecord]) -> Vec<CarrierTotals> {
    totals_by_carrier(records)
}

/// Invoice and disputed sums per invoice month.
pub fn monthly_totals(records: &[BillingRecord]) -> Vec<MonthlyTotals> {
    let mut groups: BTreeMap<&str, AmountTotals> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.invoice_month.as_str())
            .or_default()
            .add(record);
    }

    groups
        .into_iter()
        .map(|(month, totals)| MonthlyTotals {
            invoice_month: month.to_string(),
            invoice_amount_usd: totals.invoice,
            disputed_amount_usd: totals.disputed,
        })
        .collect()
}

/// [`carrier_totals`] over the records still pending reconciliation.
pub fn pending_carrier_totals(records: &[BillingRecord]) -> Vec<CarrierTotals> {
    totals_by_carrier(
        records
            .iter()
            .filter(|r| r.reconciliation_status == ReconciliationStatus::Pending),
    )
}

/// Record count per (month, reconciliation status); only non-empty combinations appear.
pub fn reconciliation_status_trend(records: &[BillingRecord]) -> Vec<StatusTrendPoint> {
    let mut groups: BTreeMap<(&str, ReconciliationStatus), usize> = BTreeMap::new();
    for record in records {
        *groups
            .entry((record.invoice_month.as_str(), record.reconciliation_status))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((month, status), count)| StatusTrendPoint {
            invoice_month: month.to_string(),
            reconciliation_status: status,
            count,
        })
        .collect()
}

/// Disputed sums per (carrier, dispute type). Undisputed records have no type and are skipped.
pub fn dispute_type_by_carrier(records: &[BillingRecord]) -> Vec<DisputeTypeTotal> {
    let mut groups: BTreeMap<(&str, DisputeType), f64> = BTreeMap::new();
    for record in records {
        if let Some(dispute_type) = record.dispute_type {
            *groups
                .entry((record.carrier_name.as_str(), dispute_type))
                .or_default() += record.disputed_amount_usd;
        }
    }

    groups
        .into_iter()
        .map(|((carrier, dispute_type), disputed)| DisputeTypeTotal {
            carrier_name: carrier.to_string(),
            dispute_type,
            disputed_amount_usd: disputed,
        })
        .collect()
}

fn totals_by_carrier_and_settlement(
    records: &[BillingRecord],
) -> BTreeMap<(&str, SettlementStatus), AmountTotals> {
    let mut groups: BTreeMap<(&str, SettlementStatus), AmountTotals> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.carrier_name.as_str(), record.settlement_status))
            .or_default()
            .add(record);
    }
    groups
}

/// Disputed sums per (carrier, settlement status).
pub fn settlement_disputes_by_carrier(records: &[BillingRecord]) -> Vec<SettlementDisputeTotal> {
    totals_by_carrier_and_settlement(records)
        .into_iter()
        .map(|((carrier, status), totals)| SettlementDisputeTotal {
            carrier_name: carrier.to_string(),
            settlement_status: status,
            disputed_amount_usd: totals.disputed,
        })
        .collect()
}

/// Record count per settlement status.
pub fn settlement_status_counts(records: &[BillingRecord]) -> Vec<SettlementCount> {
    let mut groups: BTreeMap<SettlementStatus, usize> = BTreeMap::new();
    for record in records {
        *groups.entry(record.settlement_status).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|(settlement_status, count)| SettlementCount {
            settlement_status,
            count,
        })
        .collect()
}

/// Invoice sums per (carrier, settlement status).
pub fn settlement_invoices_by_carrier(records: &[BillingRecord]) -> Vec<SettlementInvoiceTotal> {
    totals_by_carrier_and_settlement(records)
        .into_iter()
        .map(|((carrier, status), totals)| SettlementInvoiceTotal {
            carrier_name: carrier.to_string(),
            settlement_status: status,
            invoice_amount_usd: totals.invoice,
        })
        .collect()
}
