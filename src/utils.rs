use chrono::NaiveDate;
use log::debug;

/// `a - b`, or `None` when either operand is absent.
///
/// Absent is never treated as zero: a reported zero and a missing fact are different.
pub fn checked_delta(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    }
}

/// `a + b`, or `None` when either operand is absent.
pub fn checked_sum(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    }
}

/// Parses a `YYYY-MM-DD` date, treating anything unparseable as absent.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Ignoring unparseable date '{}': {}", raw, e);
            None
        }
    }
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

pub fn approx_eq(a: f64, b: f64, relative_tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= relative_tolerance * scale
}
