use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use protocol_review::workflows::review::assignment::{
    ExemptionSubtype, InMemoryReviewStore, ProtocolId, ProtocolRecord, ProtocolStatus,
    ResearchCategory, ResearchType, ReviewTrack, ReviewerId, ReviewerProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn roster_entry(
    id: &str,
    name: &str,
    code: &str,
    expertise: &[&str],
    specializations: &[&str],
    preferred: &[ResearchCategory],
    total_reviewed: u32,
) -> ReviewerProfile {
    ReviewerProfile {
        id: ReviewerId(id.to_string()),
        display_name: name.to_string(),
        short_code: code.to_string(),
        active: true,
        current_load: 0,
        max_load: 4,
        expertise: expertise.iter().map(|tag| tag.to_string()).collect(),
        specializations: specializations.iter().map(|tag| tag.to_string()).collect(),
        preferred_categories: preferred.to_vec(),
        total_reviewed,
    }
}

/// Seed roster and protocols for the serve and demo commands. Stands in for
/// the committee database until the real store lands.
pub(crate) fn seed_review_store() -> Arc<InMemoryReviewStore> {
    let store = Arc::new(InMemoryReviewStore::new());

    store.put_reviewer(roster_entry(
        "rev-001",
        "Dr. Amara Okafor",
        "AO",
        &["public-health", "epidemiology"],
        &["community health", "water safety"],
        &[ResearchCategory::PublicHealth],
        41,
    ));
    store.put_reviewer(roster_entry(
        "rev-002",
        "Dr. Bjorn Lindqvist",
        "BL",
        &["biomedical", "clinical"],
        &["oncology trials"],
        &[ResearchCategory::Biomedical],
        58,
    ));
    store.put_reviewer(roster_entry(
        "rev-003",
        "Dr. Chen Wei",
        "CW",
        &["social-science", "behavioral"],
        &["adolescent mental health"],
        &[ResearchCategory::SocialBehavioral],
        23,
    ));
    store.put_reviewer(roster_entry(
        "rev-004",
        "Dr. Dalia Haddad",
        "DH",
        &["health-systems", "operations"],
        &["clinic throughput"],
        &[ResearchCategory::HealthOperations],
        17,
    ));
    store.put_reviewer(roster_entry(
        "rev-005",
        "Dr. Emeka Obi",
        "EO",
        &["public-health", "social-science"],
        &["nutrition surveys"],
        &[ResearchCategory::PublicHealth, ResearchCategory::SocialBehavioral],
        35,
    ));
    store.put_reviewer(roster_entry(
        "rev-006",
        "Dr. Farah Noor",
        "FN",
        &["exemption-screening"],
        &["records-based research"],
        &[ResearchCategory::Exemption],
        64,
    ));
    store.put_reviewer(roster_entry(
        "rev-007",
        "Dr. Gabriel Sosa",
        "GS",
        &["biomedical"],
        &["device safety"],
        &[ResearchCategory::Biomedical],
        9,
    ));

    store.put_protocol(ProtocolRecord {
        id: ProtocolId("PR-2026-031".to_string()),
        title: "Community water quality survey".to_string(),
        research_type: ResearchType::PublicHealth,
        review_track: Some(ReviewTrack::FullBoard),
        status: ProtocolStatus::UnderReview,
    });
    store.put_protocol(ProtocolRecord {
        id: ProtocolId("PR-2026-032".to_string()),
        title: "Clinic scheduling workflow study".to_string(),
        research_type: ResearchType::HealthOperations,
        review_track: Some(ReviewTrack::Expedited),
        status: ProtocolStatus::Submitted,
    });
    store.put_protocol(ProtocolRecord {
        id: ProtocolId("PR-2026-033".to_string()),
        title: "Registry chart review".to_string(),
        research_type: ResearchType::Exemption(ExemptionSubtype::Documentary),
        review_track: None,
        status: ProtocolStatus::Submitted,
    });

    store
}
