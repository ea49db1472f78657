use crate::frame::FrameSource;
use crate::statements::{BalanceSheet, CashFlow, IncomeStatement};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reported fact set tied to a single reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawFrame {
    #[schemars(
        description = "Reporting frame identifier, e.g. 'CY2024Q1' for a duration or 'CY2024Q1I' for the instant (balance sheet) variant of the same period."
    )]
    pub frame: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Period start in YYYY-MM-DD format. Absent for instant frames. Unparseable values are treated as absent."
    )]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Period end (or snapshot date for instants) in YYYY-MM-DD format.")]
    pub end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Filing date in YYYY-MM-DD format. When present, frames are ordered by it so later filings supersede earlier ones."
    )]
    pub filed: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Concept tag to reported value, e.g. {\"Revenues\": 1000000}. Tags may carry a taxonomy prefix such as 'us-gaap:'."
    )]
    pub tags: BTreeMap<String, f64>,
}

/// A ticker's full inventory of reported frames.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactsInventory {
    #[schemars(description = "Ticker symbol the facts belong to")]
    pub ticker: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Fiscal year end as MMDD (e.g. '0930', '1231'). Falls back to the FISCAL_YEAR_END environment variable, then '0930'."
    )]
    pub fiscal_year_end: Option<String>,

    #[schemars(
        description = "Raw frames in filing-recency order (oldest first) unless every frame carries 'filed'."
    )]
    pub facts_index: Vec<RawFrame>,
}

impl FactsInventory {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FactsInventory)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// One consolidated record per fiscal frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FiscalFrameRecord {
    /// Fiscal frame label, e.g. `FY2024` or `FY2024Q1`
    pub frame: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub source: FrameSource,
    pub pl: Option<IncomeStatement>,
    pub bs: Option<BalanceSheet>,
    pub cf: Option<CashFlow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrimmedOutput {
    pub ticker: String,
    pub frames: Vec<FiscalFrameRecord>,
}

impl TrimmedOutput {
    pub fn frame(&self, label: &str) -> Option<&FiscalFrameRecord> {
        self.frames.iter().find(|f| f.frame == label)
    }
}
