use chrono::Duration;
use tracing::info;

use super::clock::Clock;
use super::domain::{
    AssignmentSlot, ProtocolId, ReassignmentRecord, ReviewStatus, ReviewerId, SlotId,
};
use super::error::{AssignmentError, NotFoundError, ValidationError};
use super::overdue::days_overdue_at;
use super::policy::REASSIGNMENT_GRACE_DAYS;
use super::repository::{DraftKey, LoadDelta, ReassignmentWrite, ReviewStore};

/// Swap the reviewer on one slot.
///
/// Validates against the slot set read at the start; the slot update, both
/// load adjustments, the audit record, and the purge of the outgoing
/// reviewer's draft land as one store command. The draft purge is
/// irreversible; callers wanting confirmation must collect it before
/// invoking this.
pub(crate) fn reassign<S: ReviewStore>(
    store: &S,
    clock: &dyn Clock,
    protocol_id: &ProtocolId,
    slot_id: &SlotId,
    new_reviewer_id: &ReviewerId,
    reason: &str,
    actor: &str,
) -> Result<AssignmentSlot, AssignmentError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::BlankReason.into());
    }

    let set = store.assignments(protocol_id)?;
    let slot = set
        .slots
        .iter()
        .find(|slot| &slot.id == slot_id)
        .cloned()
        .ok_or_else(|| NotFoundError::Slot(slot_id.clone()))?;

    // Invariant: no reviewer holds two open slots on the same protocol.
    let holds_other_slot = set.slots.iter().any(|other| {
        other.id != slot.id && &other.reviewer == new_reviewer_id && other.is_pending()
    });
    if holds_other_slot {
        return Err(ValidationError::ReviewerAlreadyAssigned(new_reviewer_id.clone()).into());
    }

    let new_reviewer = store
        .reviewer(new_reviewer_id)?
        .filter(|profile| profile.active)
        .ok_or_else(|| NotFoundError::Reviewer(new_reviewer_id.clone()))?;

    let now = clock.now();
    let days_overdue = days_overdue_at(now, slot.deadline);
    let new_deadline = now + Duration::days(REASSIGNMENT_GRACE_DAYS);

    let record = ReassignmentRecord {
        protocol: protocol_id.clone(),
        slot: slot.id.clone(),
        position: slot.position,
        instrument: slot.instrument,
        previous_reviewer: slot.reviewer.clone(),
        new_reviewer: new_reviewer.id.clone(),
        original_deadline: slot.deadline,
        new_deadline,
        reason: reason.to_string(),
        actor: actor.to_string(),
        recorded_at: now,
        days_overdue,
    };

    let mut load_deltas = Vec::new();
    // A completed slot no longer counts against the old reviewer's load.
    if slot.is_pending() {
        load_deltas.push(LoadDelta {
            reviewer: slot.reviewer.clone(),
            delta: -1,
        });
    }
    load_deltas.push(LoadDelta {
        reviewer: new_reviewer.id.clone(),
        delta: 1,
    });

    let purge_draft = DraftKey {
        protocol: protocol_id.clone(),
        reviewer: slot.reviewer.clone(),
        instrument: slot.instrument,
    };

    let updated = AssignmentSlot {
        reviewer: new_reviewer.id.clone(),
        deadline: new_deadline,
        status: ReviewStatus::Pending,
        reassigned: true,
        previous_reviewer: Some(slot.reviewer.clone()),
        ..slot.clone()
    };

    let stored = store.apply_reassignment(ReassignmentWrite {
        protocol: protocol_id.clone(),
        expected_version: set.version,
        slot: updated,
        record,
        load_deltas,
        purge_draft,
    })?;

    info!(
        protocol = %protocol_id,
        slot = %slot_id,
        from = %slot.reviewer,
        to = %new_reviewer.id,
        days_overdue,
        "slot reassigned"
    );

    Ok(stored)
}
