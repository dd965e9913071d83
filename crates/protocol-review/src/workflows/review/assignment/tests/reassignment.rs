use chrono::Duration;

use super::common::*;
use crate::workflows::review::assignment::domain::{
    AssessmentInstrument, ProtocolId, ResearchType, ReviewStatus, ReviewerId, SlotId,
};
use crate::workflows::review::assignment::error::{
    AssignmentError, NotFoundError, ValidationError,
};
use crate::workflows::review::assignment::repository::{DraftKey, ReviewStore};

#[test]
fn reassignment_swaps_reviewer_and_grants_a_fresh_deadline() {
    let (service, store, clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");
    let target = slots[0].clone();
    assert_eq!(target.reviewer, ReviewerId("a".to_string()));

    // Deadline was t0 + 14d; act three days after it lapsed.
    clock.advance(Duration::days(17));
    let now = t0() + Duration::days(17);

    let updated = service
        .reassign(
            &protocol,
            &target.id,
            &ReviewerId("f".to_string()),
            "missed deadline",
            "chair-01",
        )
        .expect("reassignment succeeds");

    assert_eq!(updated.reviewer, ReviewerId("f".to_string()));
    assert_eq!(updated.previous_reviewer, Some(ReviewerId("a".to_string())));
    assert!(updated.reassigned);
    assert_eq!(updated.status, ReviewStatus::Pending);
    assert_eq!(updated.deadline, now + Duration::days(14));
    // Shape never changes on reassignment.
    assert_eq!(updated.position, target.position);
    assert_eq!(updated.instrument, target.instrument);

    assert_eq!(load_of(&store, "a"), 0);
    assert_eq!(load_of(&store, "f"), 1);

    let history = service
        .reassignment_history(&protocol)
        .expect("history readable");
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.previous_reviewer, ReviewerId("a".to_string()));
    assert_eq!(record.new_reviewer, ReviewerId("f".to_string()));
    assert_eq!(record.reason, "missed deadline");
    assert_eq!(record.actor, "chair-01");
    assert_eq!(record.days_overdue, 3);
    assert_eq!(record.original_deadline, target.deadline);
    assert_eq!(record.new_deadline, updated.deadline);
    assert_eq!(record.position, target.position);
    assert_eq!(record.instrument, target.instrument);
}

#[test]
fn reassignment_purges_the_old_reviewers_draft() {
    let (service, store, clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");
    store.put_draft(draft("prot-1", "a", AssessmentInstrument::Review));

    let key = DraftKey {
        protocol: protocol.clone(),
        reviewer: ReviewerId("a".to_string()),
        instrument: AssessmentInstrument::Review,
    };
    assert!(store.draft(&key).expect("draft readable").is_some());

    clock.advance(Duration::days(1));
    service
        .reassign(
            &protocol,
            &slots[0].id,
            &ReviewerId("f".to_string()),
            "reviewer unavailable",
            "chair-01",
        )
        .expect("reassignment succeeds");

    assert!(store.draft(&key).expect("draft readable").is_none());
}

#[test]
fn reassigning_before_the_deadline_records_zero_days_overdue() {
    let (service, _store, clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");
    clock.advance(Duration::days(5));

    service
        .reassign(
            &protocol,
            &slots[1].id,
            &ReviewerId("d".to_string()),
            "conflict of interest",
            "chair-02",
        )
        .expect("reassignment succeeds");

    let history = service
        .reassignment_history(&protocol)
        .expect("history readable");
    assert_eq!(history[0].days_overdue, 0);
}

#[test]
fn blank_reason_is_rejected() {
    let (service, _store, _clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");

    match service.reassign(
        &protocol,
        &slots[0].id,
        &ReviewerId("f".to_string()),
        "   ",
        "chair-01",
    ) {
        Err(AssignmentError::Validation(ValidationError::BlankReason)) => {}
        other => panic!("expected blank reason rejection, got {other:?}"),
    }
}

#[test]
fn unknown_slot_is_rejected() {
    let (service, _store, _clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    match service.reassign(
        &protocol,
        &SlotId("slot-nope".to_string()),
        &ReviewerId("f".to_string()),
        "missed deadline",
        "chair-01",
    ) {
        Err(AssignmentError::NotFound(NotFoundError::Slot(id))) => {
            assert_eq!(id, SlotId("slot-nope".to_string()));
        }
        other => panic!("expected missing slot, got {other:?}"),
    }
}

#[test]
fn inactive_replacement_reviewer_is_rejected() {
    let (service, store, _clock) = build_service();
    store.put_reviewer(reviewer("z", false, 0));
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");

    match service.reassign(
        &protocol,
        &slots[0].id,
        &ReviewerId("z".to_string()),
        "missed deadline",
        "chair-01",
    ) {
        Err(AssignmentError::NotFound(NotFoundError::Reviewer(id))) => {
            assert_eq!(id, ReviewerId("z".to_string()));
        }
        other => panic!("expected inactive reviewer rejection, got {other:?}"),
    }
}

#[test]
fn replacement_already_holding_a_slot_is_rejected() {
    let (service, _store, _clock) = build_service();
    let protocol = ProtocolId("prot-1".to_string());

    let slots = service
        .assign(&protocol, ids(&["a", "b", "c"]), ResearchType::SocialBehavioral)
        .expect("assignment succeeds");

    match service.reassign(
        &protocol,
        &slots[0].id,
        &ReviewerId("b".to_string()),
        "missed deadline",
        "chair-01",
    ) {
        Err(AssignmentError::Validation(ValidationError::ReviewerAlreadyAssigned(id))) => {
            assert_eq!(id, ReviewerId("b".to_string()));
        }
        other => panic!("expected already-assigned rejection, got {other:?}"),
    }
}
