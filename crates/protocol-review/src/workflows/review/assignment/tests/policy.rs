use crate::workflows::review::assignment::domain::{
    AssessmentInstrument, ExemptionSubtype, ResearchType, ReviewTrack,
};
use crate::workflows::review::assignment::error::ValidationError;
use crate::workflows::review::assignment::policy::{
    assignment_policy, fallback_window_days, review_window_days,
};

#[test]
fn non_exemption_types_require_three_reviewers_with_standard_instruments() {
    for research in [
        ResearchType::SocialBehavioral,
        ResearchType::PublicHealth,
        ResearchType::HealthOperations,
        ResearchType::Biomedical,
    ] {
        let policy = assignment_policy(research);
        assert_eq!(policy.required_reviewers, 3);
        assert_eq!(
            policy.instruments,
            &[
                AssessmentInstrument::Review,
                AssessmentInstrument::Review,
                AssessmentInstrument::InformedConsent,
            ]
        );
    }
}

#[test]
fn exemption_policies_require_two_reviewers_with_subtype_instruments() {
    let experimental =
        assignment_policy(ResearchType::Exemption(ExemptionSubtype::Experimental));
    assert_eq!(experimental.required_reviewers, 2);
    assert_eq!(
        experimental.instruments,
        &[
            AssessmentInstrument::IacucReview,
            AssessmentInstrument::IacucReview,
        ]
    );

    let documentary = assignment_policy(ResearchType::Exemption(ExemptionSubtype::Documentary));
    assert_eq!(documentary.required_reviewers, 2);
    assert_eq!(
        documentary.instruments,
        &[
            AssessmentInstrument::ExemptionChecklist,
            AssessmentInstrument::ExemptionChecklist,
        ]
    );
}

#[test]
fn review_window_prefers_exemption_then_track() {
    let exemption = ResearchType::Exemption(ExemptionSubtype::Documentary);
    assert_eq!(review_window_days(exemption, Some(ReviewTrack::FullBoard)), 7);
    assert_eq!(
        review_window_days(ResearchType::Biomedical, Some(ReviewTrack::FullBoard)),
        30
    );
    assert_eq!(
        review_window_days(ResearchType::Biomedical, Some(ReviewTrack::Expedited)),
        14
    );
    assert_eq!(review_window_days(ResearchType::Biomedical, None), 14);
}

#[test]
fn fallback_window_only_distinguishes_exemption() {
    assert_eq!(
        fallback_window_days(ResearchType::Exemption(ExemptionSubtype::Experimental)),
        7
    );
    assert_eq!(fallback_window_days(ResearchType::PublicHealth), 14);
}

#[test]
fn research_type_codes_round_trip() {
    let parsed = ResearchType::from_codes("social/behavioral", None).expect("valid code");
    assert_eq!(parsed, ResearchType::SocialBehavioral);
    assert_eq!(parsed.code(), "social/behavioral");

    let exemption =
        ResearchType::from_codes("exemption", Some("documentary")).expect("valid exemption");
    assert_eq!(
        exemption,
        ResearchType::Exemption(ExemptionSubtype::Documentary)
    );
}

#[test]
fn unknown_research_type_is_rejected() {
    match ResearchType::from_codes("veterinary", None) {
        Err(ValidationError::UnknownResearchType(code)) => assert_eq!(code, "veterinary"),
        other => panic!("expected unknown research type, got {other:?}"),
    }
}

#[test]
fn exemption_without_subtype_is_rejected() {
    assert!(matches!(
        ResearchType::from_codes("exemption", None),
        Err(ValidationError::MissingExemptionSubtype)
    ));
    assert!(matches!(
        ResearchType::from_codes("exemption", Some("  ")),
        Err(ValidationError::MissingExemptionSubtype)
    ));
}

#[test]
fn unknown_exemption_subtype_is_rejected() {
    assert!(matches!(
        ResearchType::from_codes("exemption", Some("archival")),
        Err(ValidationError::UnknownExemptionSubtype(_))
    ));
}

#[test]
fn subtype_on_non_exemption_code_is_rejected() {
    assert!(matches!(
        ResearchType::from_codes("biomedical", Some("documentary")),
        Err(ValidationError::UnexpectedSubtype { .. })
    ));
}
