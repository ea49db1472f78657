use crate::fiscal::{classify, starts_fiscal_year, FiscalInfo, FiscalYearEnd, FrameKind, CUMULATIVE_MIN_DAYS};
use crate::schema::RawFrame;
use crate::statements::{BalanceSheet, CashFlow, IncomeStatement, StatementSection};
use crate::utils::{days_between, parse_date};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FrameSource {
    /// Taken directly from filed data
    Reported,
    /// Computed by subtracting one cumulative period from another
    DerivedDelta,
}

/// Intermediate record owned by the pipeline. The consolidator copies its fields into
/// output records; nothing here is shared with the output format.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedFrame {
    pub frame_id: String,
    pub kind: FrameKind,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub fiscal: FiscalInfo,
    pub pl: Option<IncomeStatement>,
    pub bs: Option<BalanceSheet>,
    pub cf: Option<CashFlow>,
    pub source: FrameSource,
    /// Set when `bs` was already settled upstream (including to `None`), so the
    /// consolidator must not attach a fallback snapshot.
    pub snapshot_settled: bool,
}

impl TrimmedFrame {
    /// Resolves a raw frame's tags. Instants only populate the balance sheet and
    /// durations only the income and cash flow statements.
    pub fn from_raw(raw: &RawFrame, fiscal_year_end: &FiscalYearEnd) -> Self {
        let kind = FrameKind::of(&raw.frame);
        let (start, pl, bs, cf) = match kind {
            FrameKind::Instant => (None, None, BalanceSheet::resolve(&raw.tags), None),
            FrameKind::Duration => (
                parse_date(raw.start.as_deref()),
                IncomeStatement::resolve(&raw.tags),
                None,
                CashFlow::resolve(&raw.tags),
            ),
        };
        let end = parse_date(raw.end.as_deref());

        Self {
            frame_id: raw.frame.clone(),
            kind,
            start,
            end,
            fiscal: classify(kind, start, end, fiscal_year_end),
            pl,
            bs,
            cf,
            source: FrameSource::Reported,
            snapshot_settled: false,
        }
    }

    /// Builds a derived duration record and classifies it from its dates.
    pub fn derived(
        frame_id: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        pl: Option<IncomeStatement>,
        bs: Option<BalanceSheet>,
        cf: Option<CashFlow>,
        fiscal_year_end: &FiscalYearEnd,
    ) -> Self {
        Self {
            frame_id,
            kind: FrameKind::Duration,
            start,
            end,
            fiscal: classify(FrameKind::Duration, start, end, fiscal_year_end),
            pl,
            bs,
            cf,
            source: FrameSource::DerivedDelta,
            snapshot_settled: false,
        }
    }

    /// Marks `bs` as final; a `None` balance sheet stays `None` through consolidation.
    pub fn with_settled_snapshot(mut self) -> Self {
        self.snapshot_settled = true;
        self
    }

    pub fn reclassify(&mut self, fiscal_year_end: &FiscalYearEnd) {
        self.fiscal = classify(self.kind, self.start, self.end, fiscal_year_end);
    }

    pub fn span_days(&self) -> Option<i64> {
        Some(days_between(self.start?, self.end?))
    }

    pub fn is_duration(&self) -> bool {
        self.kind == FrameKind::Duration
    }

    pub fn has_flows(&self) -> bool {
        self.pl.is_some() || self.cf.is_some()
    }

    pub fn is_annual_duration(&self) -> bool {
        self.is_duration() && self.fiscal.is_annual
    }

    /// A non-annual duration spanning more than one quarter.
    pub fn is_cumulative(&self) -> bool {
        self.is_duration()
            && !self.fiscal.is_annual
            && self.span_days().is_some_and(|d| d > CUMULATIVE_MIN_DAYS)
    }

    /// A non-annual duration covering a single quarter.
    pub fn is_discrete_quarter(&self) -> bool {
        self.is_duration() && !self.fiscal.is_annual && !self.is_cumulative()
    }

    /// A non-annual duration starting at its fiscal year's start.
    pub fn is_year_to_date(&self, fiscal_year_end: &FiscalYearEnd) -> bool {
        if !self.is_duration() || self.fiscal.is_annual {
            return false;
        }
        match (self.start, self.fiscal.fiscal_year) {
            (Some(start), Some(fiscal_year)) => {
                starts_fiscal_year(start, fiscal_year, fiscal_year_end)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn raw(frame: &str, start: Option<&str>, end: Option<&str>, tags: &[(&str, f64)]) -> RawFrame {
        RawFrame {
            frame: frame.to_string(),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            filed: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_instant_frame_only_populates_balance_sheet() {
        let fye: FiscalYearEnd = "1231".parse().unwrap();
        let frame = TrimmedFrame::from_raw(
            &raw(
                "CY2024Q1I",
                Some("2024-01-01"),
                Some("2024-03-31"),
                &[("Cash", 500.0), ("Revenues", 90.0)],
            ),
            &fye,
        );
        assert_eq!(frame.kind, FrameKind::Instant);
        assert!(frame.start.is_none());
        assert!(frame.pl.is_none());
        assert!(frame.cf.is_none());
        assert_eq!(frame.bs.as_ref().unwrap().cash, Some(500.0));
        assert_eq!(frame.fiscal.fiscal_frame.as_deref(), Some("FY2024Q1"));
    }

    #[test]
    fn test_duration_frame_only_populates_flows() {
        let fye: FiscalYearEnd = "1231".parse().unwrap();
        let frame = TrimmedFrame::from_raw(
            &raw(
                "CY2024Q1",
                Some("2024-01-01"),
                Some("2024-03-31"),
                &[("Cash", 500.0), ("Revenues", 90.0)],
            ),
            &fye,
        );
        assert!(frame.bs.is_none());
        assert_eq!(frame.pl.as_ref().unwrap().revenue, Some(90.0));
        assert!(frame.is_discrete_quarter());
        assert!(frame.is_year_to_date(&fye));
        assert_eq!(frame.source, FrameSource::Reported);
    }

    #[test]
    fn test_cumulative_and_year_to_date() {
        let fye: FiscalYearEnd = "1231".parse().unwrap();
        let nine_months = TrimmedFrame::from_raw(
            &raw("YTD", Some("2024-01-01"), Some("2024-09-30"), &[("Revenues", 280.0)]),
            &fye,
        );
        assert!(nine_months.is_cumulative());
        assert!(nine_months.is_year_to_date(&fye));
        assert!(!nine_months.is_discrete_quarter());
        assert_eq!(nine_months.fiscal.fiscal_frame.as_deref(), Some("FY2024Q3"));

        let annual = TrimmedFrame::from_raw(
            &raw("CY2024", Some("2024-01-01"), Some("2024-12-31"), &[("Revenues", 400.0)]),
            &fye,
        );
        assert!(annual.is_annual_duration());
        assert!(!annual.is_cumulative());
        assert!(!annual.is_year_to_date(&fye));
    }

    #[test]
    fn test_unparseable_dates_are_absent() {
        let fye = FiscalYearEnd::default();
        let frame = TrimmedFrame::from_raw(
            &raw("CY2024Q1", Some("bad"), Some("2024-13-01"), &[("Revenues", 1.0)]),
            &fye,
        );
        assert!(frame.start.is_none());
        assert!(frame.end.is_none());
        assert!(frame.fiscal.fiscal_frame.is_none());
        assert!(frame.span_days().is_none());
        assert!(!frame.is_cumulative());
    }
}
