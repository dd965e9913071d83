use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;
use tracing::warn;

use super::clock::Clock;
use super::domain::{
    AssignmentSlot, ProtocolId, ResearchType, ReviewStatus, ReviewerId, SlotId,
};
use super::error::{AssignmentError, NotFoundError, ValidationError};
use super::policy::{assignment_policy, fallback_window_days, review_window_days};
use super::repository::{LoadDelta, RemoveSlots, ReplaceAssignments, ReviewStore};

static SLOT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_slot_id() -> SlotId {
    let id = SLOT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SlotId(format!("slot-{id:06}"))
}

/// Fold per-reviewer adjustments so a reviewer kept across a re-assign nets
/// to zero instead of a paired -1/+1.
fn collapse_deltas(raw: BTreeMap<ReviewerId, i32>) -> Vec<LoadDelta> {
    raw.into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(reviewer, delta)| LoadDelta { reviewer, delta })
        .collect()
}

/// Create the full slot set for a protocol, replacing any existing set.
///
/// Validation happens before any write; the clear-and-insert plus all load
/// bookkeeping then lands as a single store command, so a concurrent assign
/// on the same protocol surfaces as [`AssignmentError::Conflict`] rather
/// than a doubled slot set.
pub(crate) fn assign<S: ReviewStore>(
    store: &S,
    clock: &dyn Clock,
    protocol_id: &ProtocolId,
    reviewer_ids: Vec<ReviewerId>,
    research: ResearchType,
) -> Result<Vec<AssignmentSlot>, AssignmentError> {
    let policy = assignment_policy(research);

    let reviewer_ids: Vec<ReviewerId> = reviewer_ids
        .into_iter()
        .filter(|id| !id.0.trim().is_empty())
        .collect();

    let mut seen = HashSet::new();
    for id in &reviewer_ids {
        if !seen.insert(id.clone()) {
            return Err(ValidationError::DuplicateReviewer(id.clone()).into());
        }
    }

    if reviewer_ids.len() != policy.required_reviewers {
        return Err(ValidationError::ReviewerCountMismatch {
            label: policy.label.to_string(),
            required: policy.required_reviewers,
            provided: reviewer_ids.len(),
        }
        .into());
    }

    for id in &reviewer_ids {
        let eligible = store
            .reviewer(id)
            .map_err(AssignmentError::from)?
            .map(|profile| profile.active)
            .unwrap_or(false);
        if !eligible {
            return Err(ValidationError::ReviewerNotEligible(id.clone()).into());
        }
    }

    let window_days = match store.protocol(protocol_id) {
        Ok(Some(record)) => review_window_days(research, record.review_track),
        Ok(None) => return Err(NotFoundError::Protocol(protocol_id.clone()).into()),
        Err(error) => {
            let days = fallback_window_days(research);
            warn!(
                protocol = %protocol_id,
                %error,
                fallback_days = days,
                "review track unavailable, applying fallback review window"
            );
            days
        }
    };

    let now = clock.now();
    let deadline = now + Duration::days(window_days);

    let existing = store.assignments(protocol_id)?;

    let mut deltas: BTreeMap<ReviewerId, i32> = BTreeMap::new();
    for slot in existing.slots.iter().filter(|slot| slot.is_pending()) {
        *deltas.entry(slot.reviewer.clone()).or_insert(0) -= 1;
    }
    for id in &reviewer_ids {
        *deltas.entry(id.clone()).or_insert(0) += 1;
    }

    let slots: Vec<AssignmentSlot> = reviewer_ids
        .into_iter()
        .enumerate()
        .map(|(index, reviewer)| AssignmentSlot {
            id: next_slot_id(),
            protocol: protocol_id.clone(),
            reviewer,
            instrument: policy.instruments[index],
            position: index as u8,
            research_type: research,
            assigned_at: now,
            deadline,
            status: ReviewStatus::Pending,
            reassigned: false,
            previous_reviewer: None,
        })
        .collect();

    let stored = store.replace_assignments(ReplaceAssignments {
        protocol: protocol_id.clone(),
        expected_version: existing.version,
        slots,
        load_deltas: collapse_deltas(deltas),
    })?;

    Ok(stored)
}

/// Delete every slot for the protocol, releasing the load each pending slot
/// held on its reviewer.
pub(crate) fn clear<S: ReviewStore>(
    store: &S,
    protocol_id: &ProtocolId,
) -> Result<(), AssignmentError> {
    let existing = store.assignments(protocol_id)?;
    if existing.slots.is_empty() {
        return Ok(());
    }

    let mut deltas: BTreeMap<ReviewerId, i32> = BTreeMap::new();
    for slot in existing.slots.iter().filter(|slot| slot.is_pending()) {
        *deltas.entry(slot.reviewer.clone()).or_insert(0) -= 1;
    }

    store.remove_slots(RemoveSlots {
        protocol: protocol_id.clone(),
        expected_version: existing.version,
        slot_ids: existing.slots.into_iter().map(|slot| slot.id).collect(),
        load_deltas: collapse_deltas(deltas),
    })?;

    Ok(())
}

/// Read-only listing of a protocol's slots.
pub(crate) fn list<S: ReviewStore>(
    store: &S,
    protocol_id: &ProtocolId,
) -> Result<Vec<AssignmentSlot>, AssignmentError> {
    Ok(store.assignments(protocol_id)?.slots)
}
