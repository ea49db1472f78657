//! Fiscal-frame consolidation: exactly one output record per fiscal frame.
//!
//! Balance-sheet attachment for records without one is a heuristic and only
//! approximate: a snapshot from a different restatement can end up attached to a
//! record it does not strictly belong to.

use crate::frame::{FrameSource, TrimmedFrame};
use crate::schema::FiscalFrameRecord;
use crate::statements::{BalanceSheet, CashFlow, IncomeStatement};
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::BTreeMap;

struct FiscalGroup {
    fiscal_year: Option<i32>,
    fiscal_quarter: Option<u8>,
    is_annual: bool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    source: FrameSource,
    snapshot_settled: bool,
    pl: Option<IncomeStatement>,
    bs: Option<BalanceSheet>,
    cf: Option<CashFlow>,
}

impl FiscalGroup {
    fn new(frame: &TrimmedFrame) -> Self {
        Self {
            fiscal_year: frame.fiscal.fiscal_year,
            fiscal_quarter: frame.fiscal.fiscal_quarter,
            is_annual: frame.fiscal.is_annual,
            start: None,
            end: None,
            source: FrameSource::Reported,
            snapshot_settled: false,
            pl: None,
            bs: None,
            cf: None,
        }
    }

    fn absorb(&mut self, frame: &TrimmedFrame) {
        self.end = self.end.max(frame.end);
        if self.start.is_none() {
            self.start = frame.start;
        }

        let contributes = frame.pl.is_some() || frame.bs.is_some() || frame.cf.is_some();
        if frame.pl.is_some() {
            self.pl = frame.pl.clone();
        }
        if frame.bs.is_some() {
            self.bs = frame.bs.clone();
        }
        if frame.cf.is_some() {
            self.cf = frame.cf.clone();
        }
        if frame.snapshot_settled {
            self.snapshot_settled = true;
        }
        if contributes && frame.source == FrameSource::DerivedDelta {
            self.source = FrameSource::DerivedDelta;
        }
    }

    /// Quarter a balance sheet should come from; annual records close on Q4.
    fn snapshot_quarter(&self) -> Option<u8> {
        if self.is_annual {
            Some(4)
        } else {
            self.fiscal_quarter
        }
    }
}

/// Collapses reported and derived frames into one record per fiscal frame.
///
/// Reported frames are consumed first and derived frames after them, so within a
/// group the "last non-null wins" rule favours derived sections only where they exist.
/// Multi-quarter year-to-date records never contribute: their figures are cumulative.
pub fn consolidate(reported: &[TrimmedFrame], derived: &[TrimmedFrame]) -> Vec<FiscalFrameRecord> {
    let mut groups: BTreeMap<String, FiscalGroup> = BTreeMap::new();

    for frame in reported.iter().chain(derived) {
        if frame.is_cumulative() {
            continue;
        }
        let Some(label) = frame.fiscal.fiscal_frame.as_ref() else {
            warn!("Dropping {}: no usable end date", frame.frame_id);
            continue;
        };
        groups
            .entry(label.clone())
            .or_insert_with(|| FiscalGroup::new(frame))
            .absorb(frame);
    }

    let snapshots: Vec<&TrimmedFrame> = reported
        .iter()
        .filter(|f| f.bs.is_some() && f.end.is_some())
        .collect();

    let mut records: Vec<FiscalFrameRecord> = groups
        .into_iter()
        .map(|(label, mut group)| {
            if group.bs.is_none() && !group.snapshot_settled {
                if let Some(snapshot) = fallback_snapshot(&group, &snapshots) {
                    debug!(
                        "{}: attached balance sheet from {}",
                        label, snapshot.frame_id
                    );
                    group.bs = snapshot.bs.clone();
                }
            }

            FiscalFrameRecord {
                frame: label,
                start: group.start,
                end: group.end,
                source: group.source,
                pl: group.pl,
                bs: group.bs,
                cf: group.cf.map(CashFlow::with_free_cash_flow),
            }
        })
        .collect();

    records.sort_by(|a, b| a.end.cmp(&b.end).then_with(|| a.frame.cmp(&b.frame)));
    records
}

/// Match order: same fiscal year and quarter, same fiscal year, same fiscal quarter,
/// then the most recent snapshot overall. Within a tier, snapshots at or before the
/// group end are preferred.
fn fallback_snapshot<'a>(
    group: &FiscalGroup,
    snapshots: &[&'a TrimmedFrame],
) -> Option<&'a TrimmedFrame> {
    let quarter = group.snapshot_quarter();
    let same_year = |f: &&&TrimmedFrame| {
        group.fiscal_year.is_some() && f.fiscal.fiscal_year == group.fiscal_year
    };
    let same_quarter =
        |f: &&&TrimmedFrame| quarter.is_some() && f.fiscal.fiscal_quarter == quarter;

    latest(snapshots.iter().filter(|f| same_year(f) && same_quarter(f)), None)
        .or_else(|| latest(snapshots.iter().filter(same_year), group.end))
        .or_else(|| latest(snapshots.iter().filter(same_year), None))
        .or_else(|| latest(snapshots.iter().filter(same_quarter), group.end))
        .or_else(|| latest(snapshots.iter().filter(same_quarter), None))
        .or_else(|| latest(snapshots.iter(), None))
}

/// The snapshot with the latest end, optionally restricted to ends at or before `not_after`.
fn latest<'a, 'b>(
    candidates: impl Iterator<Item = &'b &'a TrimmedFrame>,
    not_after: Option<NaiveDate>,
) -> Option<&'a TrimmedFrame>
where
    'a: 'b,
{
    candidates
        .filter(|f| match not_after {
            Some(limit) => f.end.is_some_and(|end| end <= limit),
            None => true,
        })
        .max_by_key(|f| f.end)
        .copied()
}
