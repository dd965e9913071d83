use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::clock::Clock;
use super::domain::{OverdueScanEntry, OverdueSummary, ProtocolId, ReviewerId};
use super::error::AssignmentError;
use super::repository::{LoadDelta, RemoveSlots, ReviewStore};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days past the deadline, rounded up; zero when not yet due.
pub(crate) fn days_overdue_at(now: DateTime<Utc>, deadline: DateTime<Utc>) -> i64 {
    let seconds = (now - deadline).num_seconds();
    if seconds <= 0 {
        0
    } else {
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}

/// Detect slots past their deadline and still pending, and append one scan
/// entry to the audit log.
///
/// The log keeps raw event semantics: every scan appends, including scans
/// that find nothing new, so consumers must not treat entry counts as
/// unique overdue incidents.
pub(crate) fn scan<S: ReviewStore>(
    store: &S,
    clock: &dyn Clock,
    protocol_id: &ProtocolId,
) -> Result<Vec<OverdueSummary>, AssignmentError> {
    let now = clock.now();
    let set = store.assignments(protocol_id)?;

    let overdue: Vec<OverdueSummary> = set
        .slots
        .iter()
        .filter(|slot| slot.is_overdue_at(now))
        .map(|slot| OverdueSummary {
            slot: slot.id.clone(),
            reviewer: slot.reviewer.clone(),
            instrument: slot.instrument,
            position: slot.position,
            deadline: slot.deadline,
            days_overdue: days_overdue_at(now, slot.deadline),
        })
        .collect();

    store.append_scan_entry(OverdueScanEntry {
        protocol: protocol_id.clone(),
        overdue: overdue.clone(),
        scanned_at: now,
    })?;

    Ok(overdue)
}

/// Delete every overdue slot, decrementing each affected reviewer's load so
/// the load counter keeps tracking open slots.
pub(crate) fn remove_overdue<S: ReviewStore>(
    store: &S,
    clock: &dyn Clock,
    protocol_id: &ProtocolId,
) -> Result<usize, AssignmentError> {
    let now = clock.now();
    let set = store.assignments(protocol_id)?;

    let targets: Vec<_> = set
        .slots
        .iter()
        .filter(|slot| slot.is_overdue_at(now))
        .collect();
    if targets.is_empty() {
        return Ok(0);
    }

    let mut deltas: BTreeMap<ReviewerId, i32> = BTreeMap::new();
    for slot in &targets {
        *deltas.entry(slot.reviewer.clone()).or_insert(0) -= 1;
    }

    let removed = store.remove_slots(RemoveSlots {
        protocol: protocol_id.clone(),
        expected_version: set.version,
        slot_ids: targets.into_iter().map(|slot| slot.id.clone()).collect(),
        load_deltas: deltas
            .into_iter()
            .map(|(reviewer, delta)| LoadDelta { reviewer, delta })
            .collect(),
    })?;

    Ok(removed)
}
