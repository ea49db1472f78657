//! Frame classification: instant vs. duration, fiscal year, fiscal quarter and the
//! fiscal-frame label (`FY2024`, `FY2024Q1`).

use crate::error::{FiscalFrameError, Result};
use crate::utils::days_between;
use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix marking a point-in-time (balance sheet) frame, e.g. `CY2024Q1I`.
pub const INSTANT_SUFFIX: &str = "I";

pub const DEFAULT_FISCAL_YEAR_END: &str = "0930";

/// Durations longer than this are annual.
pub const ANNUAL_MIN_DAYS: i64 = 300;

/// Non-annual durations longer than this span more than one quarter.
pub const CUMULATIVE_MIN_DAYS: i64 = 120;

/// Slack allowed between a period start and the fiscal-year start (52/53-week years).
///
/// Only period starts get this slack. The fiscal year of an end date is strict, so a
/// 0930 filer whose 53-week year closes on 2024-10-01 is labelled `FY2025` and that
/// year's Q4 cannot be derived.
pub const FISCAL_START_TOLERANCE_DAYS: i64 = 7;

/// Month and day on which the fiscal year ends, parsed from `MMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiscalYearEnd {
    month: u32,
    day: u32,
}

impl FiscalYearEnd {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        // Leap year so that 0229 is accepted.
        if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
            return Err(FiscalFrameError::InvalidFiscalYearEnd(format!(
                "{:02}{:02}",
                month, day
            )));
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// First calendar month of the fiscal year.
    pub fn fiscal_start_month(&self) -> u32 {
        (self.month % 12) + 1
    }

    /// Fiscal year label for a period ending on `end`.
    pub fn fiscal_year(&self, end: NaiveDate) -> i32 {
        if (end.month(), end.day()) <= (self.month, self.day) {
            end.year()
        } else {
            end.year() + 1
        }
    }

    pub fn fiscal_quarter(&self, end: NaiveDate) -> u8 {
        let months_from_start = (end.month() + 12 - self.fiscal_start_month()) % 12;
        (months_from_start / 3 + 1) as u8
    }

    /// Closing date of fiscal year `fiscal_year`.
    pub fn year_end_date(&self, fiscal_year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(fiscal_year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(fiscal_year, self.month, self.day - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Opening date of fiscal year `fiscal_year`: the day after the prior year end.
    pub fn year_start_date(&self, fiscal_year: i32) -> NaiveDate {
        let prior_end = self.year_end_date(fiscal_year - 1);
        prior_end.checked_add_days(Days::new(1)).unwrap_or(prior_end)
    }
}

impl Default for FiscalYearEnd {
    fn default() -> Self {
        Self { month: 9, day: 30 }
    }
}

impl FromStr for FiscalYearEnd {
    type Err = FiscalFrameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || FiscalFrameError::InvalidFiscalYearEnd(s.to_string());
        if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = s[..2].parse().map_err(|_| invalid())?;
        let day: u32 = s[2..].parse().map_err(|_| invalid())?;
        Self::new(month, day).map_err(|_| invalid())
    }
}

impl fmt::Display for FiscalYearEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Point-in-time snapshot (balance sheet)
    Instant,
    /// Period-covering fact set (income statement, cash flow)
    Duration,
}

impl FrameKind {
    pub fn of(frame_id: &str) -> Self {
        if frame_id.ends_with(INSTANT_SUFFIX) {
            Self::Instant
        } else {
            Self::Duration
        }
    }
}

/// Strips the instant marker so both variants of one reporting period share a key.
pub fn base_frame_id(frame_id: &str) -> &str {
    frame_id.strip_suffix(INSTANT_SUFFIX).unwrap_or(frame_id)
}

/// Fiscal classification of a frame. Always recomputed from dates, never stored apart
/// from the frame it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiscalInfo {
    pub fiscal_year: Option<i32>,
    pub fiscal_quarter: Option<u8>,
    pub is_annual: bool,
    pub fiscal_frame: Option<String>,
}

pub fn classify(
    kind: FrameKind,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fiscal_year_end: &FiscalYearEnd,
) -> FiscalInfo {
    let Some(end) = end else {
        return FiscalInfo::default();
    };

    let fiscal_year = fiscal_year_end.fiscal_year(end);
    let fiscal_quarter = fiscal_year_end.fiscal_quarter(end);
    let is_annual = match (kind, start) {
        (FrameKind::Duration, Some(start)) => days_between(start, end) > ANNUAL_MIN_DAYS,
        _ => false,
    };

    let fiscal_frame = if is_annual {
        format!("FY{}", fiscal_year)
    } else {
        format!("FY{}Q{}", fiscal_year, fiscal_quarter)
    };

    FiscalInfo {
        fiscal_year: Some(fiscal_year),
        fiscal_quarter: Some(fiscal_quarter),
        is_annual,
        fiscal_frame: Some(fiscal_frame),
    }
}

/// True when a duration starting on `start` begins its fiscal year.
pub fn starts_fiscal_year(
    start: NaiveDate,
    fiscal_year: i32,
    fiscal_year_end: &FiscalYearEnd,
) -> bool {
    let year_start = fiscal_year_end.year_start_date(fiscal_year);
    days_between(year_start, start).abs() <= FISCAL_START_TOLERANCE_DAYS
}
