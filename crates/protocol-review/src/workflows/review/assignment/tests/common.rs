use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::review::assignment::clock::Clock;
use crate::workflows::review::assignment::domain::{
    AssessmentDraft, AssessmentInstrument, ProtocolId, ProtocolRecord, ProtocolStatus,
    ResearchCategory, ResearchType, ReviewTrack, ReviewerId, ReviewerProfile,
};
use crate::workflows::review::assignment::memory::InMemoryReviewStore;
use crate::workflows::review::assignment::repository::ReviewStore;
use crate::workflows::review::assignment::service::ReviewAssignmentService;

/// Clock the tests can move by hand.
pub(super) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn reviewer(id: &str, active: bool, current_load: u32) -> ReviewerProfile {
    ReviewerProfile {
        id: ReviewerId(id.to_string()),
        display_name: format!("Reviewer {id}"),
        short_code: id.to_ascii_uppercase(),
        active,
        current_load,
        max_load: 5,
        expertise: vec!["social-science".to_string()],
        specializations: Vec::new(),
        preferred_categories: vec![ResearchCategory::SocialBehavioral],
        total_reviewed: 12,
    }
}

pub(super) fn protocol(
    id: &str,
    research_type: ResearchType,
    review_track: Option<ReviewTrack>,
) -> ProtocolRecord {
    ProtocolRecord {
        id: ProtocolId(id.to_string()),
        title: format!("Protocol {id}"),
        research_type,
        review_track,
        status: ProtocolStatus::UnderReview,
    }
}

pub(super) fn draft(protocol_id: &str, reviewer_id: &str, instrument: AssessmentInstrument) -> AssessmentDraft {
    AssessmentDraft {
        protocol: ProtocolId(protocol_id.to_string()),
        reviewer: ReviewerId(reviewer_id.to_string()),
        instrument,
        body: "partial findings".to_string(),
        updated_at: t0(),
    }
}

/// Store seeded with reviewers a..f (all active, idle) and one
/// social/behavioral protocol on the expedited track.
pub(super) fn build_service() -> (
    ReviewAssignmentService<InMemoryReviewStore>,
    Arc<InMemoryReviewStore>,
    Arc<FixedClock>,
) {
    let store = Arc::new(InMemoryReviewStore::new());
    let clock = Arc::new(FixedClock::at(t0()));

    for id in ["a", "b", "c", "d", "e", "f"] {
        store.put_reviewer(reviewer(id, true, 0));
    }
    store.put_protocol(protocol(
        "prot-1",
        ResearchType::SocialBehavioral,
        Some(ReviewTrack::Expedited),
    ));

    let service = ReviewAssignmentService::with_clock(store.clone(), clock.clone());
    (service, store, clock)
}

pub(super) fn ids(raw: &[&str]) -> Vec<ReviewerId> {
    raw.iter().map(|id| ReviewerId(id.to_string())).collect()
}

pub(super) fn load_of(store: &InMemoryReviewStore, id: &str) -> u32 {
    store
        .reviewer(&ReviewerId(id.to_string()))
        .expect("store read succeeds")
        .expect("reviewer seeded")
        .current_load
}
