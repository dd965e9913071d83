use super::domain::{AssessmentInstrument, ExemptionSubtype, ResearchType, ReviewTrack};

/// Days granted on the replacement deadline when a slot is reassigned,
/// independent of the original review window.
pub const REASSIGNMENT_GRACE_DAYS: i64 = 14;

const EXEMPTION_WINDOW_DAYS: i64 = 7;
const FULL_BOARD_WINDOW_DAYS: i64 = 30;
const STANDARD_WINDOW_DAYS: i64 = 14;

/// How many reviewers a protocol needs and which instrument each position gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPolicy {
    pub required_reviewers: usize,
    pub instruments: &'static [AssessmentInstrument],
    pub label: &'static str,
}

/// Deterministic policy table keyed on the research type.
///
/// Total on the typed enum; unknown wire codes are rejected earlier by
/// [`ResearchType::from_codes`].
pub fn assignment_policy(research: ResearchType) -> AssignmentPolicy {
    use AssessmentInstrument::{ExemptionChecklist, IacucReview, InformedConsent, Review};

    const STANDARD: &[AssessmentInstrument] = &[Review, Review, InformedConsent];
    const EXPERIMENTAL: &[AssessmentInstrument] = &[IacucReview, IacucReview];
    const DOCUMENTARY: &[AssessmentInstrument] = &[ExemptionChecklist, ExemptionChecklist];

    match research {
        ResearchType::SocialBehavioral => AssignmentPolicy {
            required_reviewers: 3,
            instruments: STANDARD,
            label: "Social/Behavioral Research",
        },
        ResearchType::PublicHealth => AssignmentPolicy {
            required_reviewers: 3,
            instruments: STANDARD,
            label: "Public Health Research",
        },
        ResearchType::HealthOperations => AssignmentPolicy {
            required_reviewers: 3,
            instruments: STANDARD,
            label: "Health Operations Research",
        },
        ResearchType::Biomedical => AssignmentPolicy {
            required_reviewers: 3,
            instruments: STANDARD,
            label: "Biomedical Research",
        },
        ResearchType::Exemption(ExemptionSubtype::Experimental) => AssignmentPolicy {
            required_reviewers: 2,
            instruments: EXPERIMENTAL,
            label: "Exemption (Experimental)",
        },
        ResearchType::Exemption(ExemptionSubtype::Documentary) => AssignmentPolicy {
            required_reviewers: 2,
            instruments: DOCUMENTARY,
            label: "Exemption (Documentary)",
        },
    }
}

/// Review window in days, in priority order: exemption, then full-board
/// track, then the standard expedited window.
pub fn review_window_days(research: ResearchType, track: Option<ReviewTrack>) -> i64 {
    if research.is_exemption() {
        return EXEMPTION_WINDOW_DAYS;
    }
    match track {
        Some(ReviewTrack::FullBoard) => FULL_BOARD_WINDOW_DAYS,
        Some(ReviewTrack::Expedited) | None => STANDARD_WINDOW_DAYS,
    }
}

/// Window applied when the protocol's declared track cannot be read at all.
/// Callers must log the degradation; this function only picks the number.
pub fn fallback_window_days(research: ResearchType) -> i64 {
    if research.is_exemption() {
        EXEMPTION_WINDOW_DAYS
    } else {
        STANDARD_WINDOW_DAYS
    }
}
