//! # Billing Reconciliation Dashboard
//!
//! A library that generates a reproducible table of synthetic telecom billing records,
//! filters it by carrier and month, and computes the grouped aggregations behind a
//! four-tab reconciliation dashboard.
//!
//! ## Core Concepts
//!
//! - **Base table**: one [`BillingRecord`] per (month, carrier) pair, generated once from a seed
//! - **Filtered view**: the records matching the carrier and month selectors, in base-table order
//! - **Aggregations**: pure group-by functions (sums and counts) over a filtered view
//! - **Report**: tabs and panels pairing each aggregation with a chart kind and encoding
//! - **Advisories**: non-fatal conditions (no data, too few carriers for a month)
//!
//! ## Example
//!
//! ```rust,ignore
//! use billing_recon_dashboard::*;
//!
//! let dataset = BillingDataset::with_seed(42).unwrap();
//! let report = DashboardProcessor::process(&dataset, "Carrier 1", "All").unwrap();
//!
//! for tab in &report.tabs {
//!     println!("{} ({} panels)", tab.title, tab.panels.len());
//! }
//! ```

pub mod aggregations;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod generator;
pub mod schema;
pub mod utils;

pub use aggregations::*;
pub use dashboard::{
    ChartEncoding, ChartKind, DashboardPanel, DashboardReport, DashboardTab, PanelData, PanelRows,
};
pub use dataset::BillingDataset;
pub use error::{DashboardError, Result};
pub use filter::{apply_filters, Advisory, FilteredView, Selector, ALL_SENTINEL, MIN_CARRIERS_PER_MONTH};
pub use generator::{generate, RecordGenerator};
pub use schema::*;

use log::info;

pub struct DashboardProcessor;

impl DashboardProcessor {
    /// Filters `dataset` with the raw selector strings and builds the report.
    ///
    /// An unknown selector value fails with [`DashboardError::InvalidSelector`]; the dataset is
    /// never modified, so the caller can keep showing its previous report.
    pub fn process(dataset: &BillingDataset, carrier: &str, month: &str) -> Result<DashboardReport> {
        let carrier_selector = Selector::parse(carrier);
        let month_selector = Selector::parse(month);

        info!(
            "Building dashboard for carrier={} month={} over {} records",
            carrier_selector,
            month_selector,
            dataset.len()
        );

        let view = dataset.filter(&carrier_selector, &month_selector)?;
        Ok(DashboardReport::from_view(&view))
    }

    /// Generates a fresh dataset from `config` and builds the report for one selection.
    pub fn process_config(config: GeneratorConfig, carrier: &str, month: &str) -> Result<DashboardReport> {
        let dataset = BillingDataset::generate(config)?;
        Self::process(&dataset, carrier, month)
    }
}

pub fn build_dashboard(dataset: &BillingDataset, carrier: &str, month: &str) -> Result<DashboardReport> {
    DashboardProcessor::process(dataset, carrier, month)
}
