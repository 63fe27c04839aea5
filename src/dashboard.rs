use crate::aggregations::*;
use crate::filter::{Advisory, FilteredView};
use crate::schema::BillingRecord;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const COL_CARRIER: &str = "Carrier Name";
pub const COL_INVOICE: &str = "Invoice Amount (USD)";
pub const COL_DISPUTED: &str = "Disputed Amount (USD)";
pub const COL_MONTH: &str = "Invoice Month";
pub const COL_RECONCILIATION: &str = "Reconciliation Status";
pub const COL_DISPUTE_TYPE: &str = "Dispute Type";
pub const COL_SETTLEMENT: &str = "Settlement Status";
pub const COL_COUNT: &str = "Count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[schemars(description = "Plain table of records")]
    Table,
    #[schemars(description = "Single-series bar chart")]
    Bar,
    #[schemars(description = "Several y columns side by side per x value")]
    GroupedBar,
    #[schemars(description = "Bars split by the color column, stacked per x value")]
    StackedBar,
    #[schemars(description = "One line per y column, or per color value when a color column is set")]
    Line,
    #[schemars(description = "Slices named by the x column, sized by the single y column")]
    Pie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChartEncoding {
    pub x: Option<String>,
    pub y: Vec<String>,
    pub color: Option<String>,
}

impl ChartEncoding {
    fn new(x: &str, y: &[&str]) -> Self {
        Self {
            x: Some(x.to_string()),
            y: y.iter().map(|c| c.to_string()).collect(),
            color: None,
        }
    }

    fn colored_by(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    fn table() -> Self {
        Self {
            x: None,
            y: Vec::new(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "table", content = "rows", rename_all = "snake_case")]
pub enum PanelRows {
    Records(Vec<BillingRecord>),
    CarrierTotals(Vec<CarrierTotals>),
    MonthlyTotals(Vec<MonthlyTotals>),
    StatusTrend(Vec<StatusTrendPoint>),
    DisputeTypes(Vec<DisputeTypeTotal>),
    SettlementDisputes(Vec<SettlementDisputeTotal>),
    SettlementCounts(Vec<SettlementCount>),
    SettlementInvoices(Vec<SettlementInvoiceTotal>),
}

impl PanelRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Records(rows) => rows.len(),
            Self::CarrierTotals(rows) => rows.len(),
            Self::MonthlyTotals(rows) => rows.len(),
            Self::StatusTrend(rows) => rows.len(),
            Self::DisputeTypes(rows) => rows.len(),
            Self::SettlementDisputes(rows) => rows.len(),
            Self::SettlementCounts(rows) => rows.len(),
            Self::SettlementInvoices(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum PanelData {
    NoData,
    Rows(PanelRows),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardPanel {
    pub title: String,
    pub chart: ChartKind,
    pub encoding: ChartEncoding,
    pub data: PanelData,
}

impl DashboardPanel {
    fn new(title: &str, chart: ChartKind, encoding: ChartEncoding, rows: PanelRows) -> Self {
        let data = if rows.is_empty() {
            PanelData::NoData
        } else {
            PanelData::Rows(rows)
        };

        Self {
            title: title.to_string(),
            chart,
            encoding,
            data,
        }
    }

    pub fn rows(&self) -> Option<&PanelRows> {
        match &self.data {
            PanelData::Rows(rows) => Some(rows),
            PanelData::NoData => None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.rows().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardTab {
    pub title: String,
    pub heading: String,
    pub panels: Vec<DashboardPanel>,
}

impl DashboardTab {
    pub fn panel(&self, title: &str) -> Option<&DashboardPanel> {
        self.panels.iter().find(|p| p.title == title)
    }
}

/// Everything a presentation layer needs to draw the dashboard for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardReport {
    pub carrier_selector: String,
    pub month_selector: String,
    pub record_count: usize,
    pub advisories: Vec<Advisory>,
    /// Empty when the filtered view is empty.
    pub tabs: Vec<DashboardTab>,
}

impl DashboardReport {
    pub fn from_view(view: &FilteredView) -> Self {
        let tabs = if view.is_empty() {
            Vec::new()
        } else {
            build_tabs(view.records())
        };

        debug!(
            "Built dashboard report: {} tabs, {} panels, {} advisories",
            tabs.len(),
            tabs.iter().map(|t| t.panels.len()).sum::<usize>(),
            view.advisories().len()
        );

        Self {
            carrier_selector: view.carrier_selector.to_string(),
            month_selector: view.month_selector.to_string(),
            record_count: view.len(),
            advisories: view.advisories().to_vec(),
            tabs,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.advisories.contains(&Advisory::EmptyResult)
    }

    pub fn tab(&self, title: &str) -> Option<&DashboardTab> {
        self.tabs.iter().find(|t| t.title == title)
    }

    pub fn panels(&self) -> impl Iterator<Item = &DashboardPanel> {
        self.tabs.iter().flat_map(|t| t.panels.iter())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardReport)
    }
}

fn build_tabs(records: &[BillingRecord]) -> Vec<DashboardTab> {
    vec![
        DashboardTab {
            title: "Invoice Recon".to_string(),
            heading: "Invoice Reconciliation Overview".to_string(),
            panels: vec![
                DashboardPanel::new(
                    "Invoice Records",
                    ChartKind::Table,
                    ChartEncoding::table(),
                    PanelRows::Records(records.to_vec()),
                ),
                DashboardPanel::new(
                    "Disputed vs Processed Amounts by Carrier",
                    ChartKind::GroupedBar,
                    ChartEncoding::new(COL_CARRIER, &[COL_INVOICE, COL_DISPUTED]),
                    PanelRows::CarrierTotals(carrier_totals(records)),
                ),
                DashboardPanel::new(
                    "Invoice Disputes by Month",
                    ChartKind::Line,
                    ChartEncoding::new(COL_MONTH, &[COL_INVOICE, COL_DISPUTED]),
                    PanelRows::MonthlyTotals(monthly_totals(records)),
                ),
            ],
        },
        DashboardTab {
            title: "Reconciliation Summary".to_string(),
            heading: "Reconciliation Summary".to_string(),
            panels: vec![
                DashboardPanel::new(
                    "Invoices with Pending Reconciliation by Carrier",
                    ChartKind::Bar,
                    ChartEncoding::new(COL_CARRIER, &[COL_INVOICE]),
                    PanelRows::CarrierTotals(pending_carrier_totals(records)),
                ),
                DashboardPanel::new(
                    "Reconciliation Trend Over Time",
                    ChartKind::Line,
                    ChartEncoding::new(COL_MONTH, &[COL_COUNT]).colored_by(COL_RECONCILIATION),
                    PanelRows::StatusTrend(reconciliation_status_trend(records)),
                ),
            ],
        },
        DashboardTab {
            title: "Dispute Summary".to_string(),
            heading: "Dispute Summary".to_string(),
            panels: vec![
                DashboardPanel::new(
                    "Disputes by Type and Carrier",
                    ChartKind::StackedBar,
                    ChartEncoding::new(COL_CARRIER, &[COL_DISPUTED]).colored_by(COL_DISPUTE_TYPE),
                    PanelRows::DisputeTypes(dispute_type_by_carrier(records)),
                ),
                DashboardPanel::new(
                    "Settled vs Unsettled Disputes by Carrier",
                    ChartKind::StackedBar,
                    ChartEncoding::new(COL_CARRIER, &[COL_DISPUTED]).colored_by(COL_SETTLEMENT),
                    PanelRows::SettlementDisputes(settlement_disputes_by_carrier(records)),
                ),
            ],
        },
        DashboardTab {
            title: "Settlement Summary".to_string(),
            heading: "Settlement Summary".to_string(),
            panels: vec![
                DashboardPanel::new(
                    "Settlement Status by Carrier",
                    ChartKind::Pie,
                    ChartEncoding::new(COL_SETTLEMENT, &[COL_COUNT]),
                    PanelRows::SettlementCounts(settlement_status_counts(records)),
                ),
                DashboardPanel::new(
                    "Outstanding vs Settled Amounts",
                    ChartKind::StackedBar,
                    ChartEncoding::new(COL_CARRIER, &[COL_INVOICE]).colored_by(COL_SETTLEMENT),
                    PanelRows::SettlementInvoices(settlement_invoices_by_carrier(records)),
                ),
            ],
        },
    ]
}
