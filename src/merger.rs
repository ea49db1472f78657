//! Base-frame merging.
//!
//! The instant and duration variants of one reporting period (`CY2024Q1I` and
//! `CY2024Q1`) collapse into a single candidate record.
//!
//! Ordering precondition: frames must arrive in filing-recency order (oldest first).
//! Sections follow "last non-null wins", so a later, more complete filing of the same
//! base frame supersedes an earlier partial one. See [`order_by_recency`].

use crate::fiscal::{base_frame_id, FiscalYearEnd, FrameKind};
use crate::frame::TrimmedFrame;
use crate::schema::RawFrame;
use crate::utils::parse_date;
use log::debug;
use std::collections::BTreeMap;

/// Stable-sorts frames by their `filed` date. Frames without one keep their relative
/// order and sort ahead of dated frames.
pub fn order_by_recency(frames: &[RawFrame]) -> Vec<&RawFrame> {
    let mut ordered: Vec<&RawFrame> = frames.iter().collect();
    ordered.sort_by_key(|f| parse_date(f.filed.as_deref()));
    ordered
}

/// Merges raw frames sharing a base identifier. Output keeps first-encounter order.
pub fn merge_base_frames<'a>(
    frames: impl IntoIterator<Item = &'a RawFrame>,
    fiscal_year_end: &FiscalYearEnd,
) -> Vec<TrimmedFrame> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut merged: Vec<TrimmedFrame> = Vec::new();
    let mut raw_count = 0usize;

    for raw in frames {
        raw_count += 1;
        let resolved = TrimmedFrame::from_raw(raw, fiscal_year_end);
        let key = base_frame_id(&raw.frame).to_string();

        match index.get(&key) {
            Some(&i) => absorb(&mut merged[i], resolved),
            None => {
                let mut candidate = resolved;
                candidate.frame_id = key.clone();
                index.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    for frame in &mut merged {
        frame.reclassify(fiscal_year_end);
    }

    debug!(
        "Merged {} raw frames into {} base frames",
        raw_count,
        merged.len()
    );

    merged
}

fn absorb(target: &mut TrimmedFrame, incoming: TrimmedFrame) {
    if target.start.is_none() {
        target.start = incoming.start;
    }
    if target.end.is_none() {
        target.end = incoming.end;
    }
    if incoming.kind == FrameKind::Duration {
        target.kind = FrameKind::Duration;
    }
    if incoming.pl.is_some() {
        target.pl = incoming.pl;
    }
    if incoming.bs.is_some() {
        target.bs = incoming.bs;
    }
    if incoming.cf.is_some() {
        target.cf = incoming.cf;
    }
}
