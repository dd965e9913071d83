use serde::{Deserialize, Serialize};

use super::domain::{ResearchCategory, ResearchType, ReviewerProfile};

const AVAILABILITY_POINTS: f32 = 10.0;
const LOAD_HEADROOM_POINTS: f32 = 8.0;
const EXPERTISE_POINTS_PER_TAG: f32 = 5.0;
const PREFERRED_CATEGORY_POINTS: f32 = 7.0;
const KEYWORD_POINTS_PER_MATCH: f32 = 3.0;
const EXPERIENCE_POINTS: f32 = 5.0;
const EXPERIENCE_MIDPOINT: f32 = 25.0;

/// Which rubric factor contributed points to a candidate's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankFactor {
    Availability,
    LoadBalance,
    Expertise,
    PreferredType,
    Specialization,
    Experience,
}

/// Discrete contribution to a candidate's score, kept so chairpersons can
/// audit why the directory ordered the roster the way it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSignal {
    pub factor: RankFactor,
    pub points: f32,
    pub notes: String,
}

/// One scored roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReviewer {
    pub reviewer: ReviewerProfile,
    pub score: f32,
    pub signals: Vec<RankSignal>,
}

/// Expertise tags the rubric treats as required for each research category.
pub fn required_expertise(category: ResearchCategory) -> &'static [&'static str] {
    match category {
        ResearchCategory::SocialBehavioral => &["social-science", "behavioral"],
        ResearchCategory::PublicHealth => &["public-health", "epidemiology"],
        ResearchCategory::HealthOperations => &["health-systems", "operations"],
        ResearchCategory::Biomedical => &["biomedical", "clinical"],
        ResearchCategory::Exemption => &["exemption-screening"],
    }
}

/// Rank the roster for a protocol. Soft ranking only: nothing is filtered
/// out, an unavailable or overloaded reviewer simply sinks. Eligibility is
/// enforced by the registry at assignment time, not here.
pub fn rank_reviewers(
    roster: &[ReviewerProfile],
    research: ResearchType,
    keywords: &[String],
) -> Vec<RankedReviewer> {
    let mut ranked: Vec<RankedReviewer> = roster
        .iter()
        .map(|reviewer| score_reviewer(reviewer, research, keywords))
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.reviewer.current_load.cmp(&b.reviewer.current_load))
            .then_with(|| a.reviewer.id.cmp(&b.reviewer.id))
    });

    ranked
}

fn score_reviewer(
    reviewer: &ReviewerProfile,
    research: ResearchType,
    keywords: &[String],
) -> RankedReviewer {
    let mut signals = Vec::new();
    let category = research.category();

    if reviewer.active {
        signals.push(RankSignal {
            factor: RankFactor::Availability,
            points: AVAILABILITY_POINTS,
            notes: "accepting assignments".to_string(),
        });
    } else {
        signals.push(RankSignal {
            factor: RankFactor::Availability,
            points: 0.0,
            notes: "not accepting assignments".to_string(),
        });
    }

    if reviewer.max_load > 0 {
        let headroom =
            (1.0 - reviewer.current_load as f32 / reviewer.max_load as f32).clamp(0.0, 1.0);
        signals.push(RankSignal {
            factor: RankFactor::LoadBalance,
            points: LOAD_HEADROOM_POINTS * headroom,
            notes: format!(
                "{} of {} active slots in use",
                reviewer.current_load, reviewer.max_load
            ),
        });
    }

    for tag in required_expertise(category) {
        if reviewer
            .expertise
            .iter()
            .any(|owned| owned.eq_ignore_ascii_case(tag))
        {
            signals.push(RankSignal {
                factor: RankFactor::Expertise,
                points: EXPERTISE_POINTS_PER_TAG,
                notes: format!("holds required expertise '{tag}'"),
            });
        }
    }

    if reviewer.preferred_categories.contains(&category) {
        signals.push(RankSignal {
            factor: RankFactor::PreferredType,
            points: PREFERRED_CATEGORY_POINTS,
            notes: format!("prefers {} protocols", research.code()),
        });
    }

    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        let lowered = keyword.to_ascii_lowercase();
        if reviewer
            .specializations
            .iter()
            .any(|spec| spec.to_ascii_lowercase().contains(&lowered))
        {
            signals.push(RankSignal {
                factor: RankFactor::Specialization,
                points: KEYWORD_POINTS_PER_MATCH,
                notes: format!("specialization matches '{keyword}'"),
            });
        }
    }

    // Diminishing returns: half the experience points at the midpoint,
    // asymptotic to the cap for long-serving reviewers.
    let total = reviewer.total_reviewed as f32;
    if total > 0.0 {
        signals.push(RankSignal {
            factor: RankFactor::Experience,
            points: EXPERIENCE_POINTS * (total / (total + EXPERIENCE_MIDPOINT)),
            notes: format!("{} reviews completed", reviewer.total_reviewed),
        });
    }

    let score = signals.iter().map(|signal| signal.points).sum();

    RankedReviewer {
        reviewer: reviewer.clone(),
        score,
        signals,
    }
}
