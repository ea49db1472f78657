//! Reconstruction of quarters that were never reported directly.
//!
//! Both derivations subtract one cumulative figure from another. Balance sheets are
//! point-in-time and are never derived by subtraction.

use crate::fiscal::FiscalYearEnd;
use crate::frame::TrimmedFrame;
use crate::statements::{BalanceSheet, CashFlow, IncomeStatement, StatementSection};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Year-to-date operand for a Q4 derivation.
struct YearToDate {
    end: Option<NaiveDate>,
    pl: Option<IncomeStatement>,
    cf: Option<CashFlow>,
}

fn by_fiscal_year(frames: &[TrimmedFrame]) -> BTreeMap<i32, Vec<&TrimmedFrame>> {
    let mut years: BTreeMap<i32, Vec<&TrimmedFrame>> = BTreeMap::new();
    for frame in frames {
        if let Some(year) = frame.fiscal.fiscal_year {
            years.entry(year).or_default().push(frame);
        }
    }
    years
}

/// Derives `Q4 = annual - YTD(Q1..Q3)` for each fiscal year that has an annual record
/// but no directly reported fourth quarter.
pub fn derive_fourth_quarters(
    frames: &[TrimmedFrame],
    fiscal_year_end: &FiscalYearEnd,
) -> Vec<TrimmedFrame> {
    let mut derived = Vec::new();

    for (fiscal_year, year_frames) in by_fiscal_year(frames) {
        let Some(annual) = year_frames
            .iter()
            .rev()
            .find(|f| f.is_annual_duration() && f.has_flows())
        else {
            continue;
        };

        let has_direct_q4 = year_frames
            .iter()
            .any(|f| f.is_discrete_quarter() && f.fiscal.fiscal_quarter == Some(4) && f.has_flows());
        if has_direct_q4 {
            continue;
        }

        let Some(ytd) = nine_month_year_to_date(&year_frames, fiscal_year_end)
            .or_else(|| summed_quarters(&year_frames))
        else {
            debug!(
                "FY{}: annual record present but no Q1-Q3 coverage, Q4 not derived",
                fiscal_year
            );
            continue;
        };

        let pl = IncomeStatement::delta_of(annual.pl.as_ref(), ytd.pl.as_ref());
        let cf = CashFlow::delta_of(annual.cf.as_ref(), ytd.cf.as_ref());
        if pl.is_none() && cf.is_none() {
            debug!("FY{}: Q4 delta has no known fields, skipped", fiscal_year);
            continue;
        }

        let bs = fourth_quarter_snapshot(&year_frames);
        let frame = TrimmedFrame::derived(
            format!("FY{}Q4-derived", fiscal_year),
            ytd.end,
            annual.end,
            pl,
            bs,
            cf,
            fiscal_year_end,
        )
        .with_settled_snapshot();
        debug!(
            "Derived {:?} from annual {} less year-to-date through {:?}",
            frame.fiscal.fiscal_frame, annual.frame_id, ytd.end
        );
        derived.push(frame);
    }

    derived
}

/// The cumulative year-to-date record ending in Q3. Ties prefer the longest span, then
/// the latest end, then the most recently filed.
fn nine_month_year_to_date(
    year_frames: &[&TrimmedFrame],
    fiscal_year_end: &FiscalYearEnd,
) -> Option<YearToDate> {
    year_frames
        .iter()
        .filter(|f| {
            f.is_cumulative()
                && f.is_year_to_date(fiscal_year_end)
                && f.fiscal.fiscal_quarter == Some(3)
                && f.has_flows()
        })
        .max_by_key(|f| (f.span_days(), f.end))
        .map(|f| YearToDate {
            end: f.end,
            pl: f.pl.clone(),
            cf: f.cf.clone(),
        })
}

/// Falls back to `Q1 + Q2 + Q3` when each quarter was reported discretely.
fn summed_quarters(year_frames: &[&TrimmedFrame]) -> Option<YearToDate> {
    let quarter = |q: u8| {
        year_frames
            .iter()
            .rev()
            .find(|f| f.is_discrete_quarter() && f.fiscal.fiscal_quarter == Some(q) && f.has_flows())
    };
    let (q1, q2, q3) = (quarter(1)?, quarter(2)?, quarter(3)?);

    let pl = IncomeStatement::sum_of(q1.pl.as_ref(), q2.pl.as_ref());
    let pl = IncomeStatement::sum_of(pl.as_ref(), q3.pl.as_ref());
    let cf = CashFlow::sum_of(q1.cf.as_ref(), q2.cf.as_ref());
    let cf = CashFlow::sum_of(cf.as_ref(), q3.cf.as_ref());

    Some(YearToDate { end: q3.end, pl, cf })
}

/// The balance sheet of the fiscal year's fourth quarter, latest snapshot first.
fn fourth_quarter_snapshot(year_frames: &[&TrimmedFrame]) -> Option<BalanceSheet> {
    year_frames
        .iter()
        .filter(|f| f.bs.is_some() && f.fiscal.fiscal_quarter == Some(4))
        .max_by_key(|f| f.end)
        .and_then(|f| f.bs.clone())
}

/// Derives a discrete interim quarter as `thisYTD - priorYTD` wherever only the
/// cumulative year-to-date figures were reported for it.
pub fn backfill_year_to_date(
    frames: &[TrimmedFrame],
    fiscal_year_end: &FiscalYearEnd,
) -> Vec<TrimmedFrame> {
    let mut derived = Vec::new();

    for (fiscal_year, year_frames) in by_fiscal_year(frames) {
        let year_to_date: Vec<&TrimmedFrame> = year_frames
            .iter()
            .copied()
            .filter(|f| f.is_year_to_date(fiscal_year_end) && f.has_flows())
            .collect();

        for current in year_to_date.iter().filter(|f| f.is_cumulative()) {
            let label = current.fiscal.fiscal_frame.as_deref();
            let reported_directly = year_frames
                .iter()
                .any(|f| f.is_discrete_quarter() && f.has_flows() && f.fiscal.fiscal_frame.as_deref() == label);
            if reported_directly {
                continue;
            }

            let Some(prior) = year_to_date
                .iter()
                .filter(|f| f.end < current.end)
                .max_by_key(|f| f.end)
            else {
                debug!(
                    "FY{}: no earlier year-to-date record before {}, backfill skipped",
                    fiscal_year, current.frame_id
                );
                continue;
            };

            let pl = IncomeStatement::delta_of(current.pl.as_ref(), prior.pl.as_ref());
            let cf = CashFlow::delta_of(current.cf.as_ref(), prior.cf.as_ref());
            if pl.is_none() && cf.is_none() {
                continue;
            }

            let frame = TrimmedFrame::derived(
                format!("{}-backfill", current.frame_id),
                prior.end,
                current.end,
                pl,
                None,
                cf,
                fiscal_year_end,
            );
            if !frame.is_discrete_quarter() {
                debug!(
                    "{} less {} spans more than one quarter, backfill skipped",
                    current.frame_id, prior.frame_id
                );
                continue;
            }
            debug!(
                "Backfilled {:?} from {} less {}",
                frame.fiscal.fiscal_frame, current.frame_id, prior.frame_id
            );
            derived.push(frame);
        }
    }

    derived
}
