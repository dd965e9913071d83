use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Identifier wrapper for submitted protocols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolId(pub String);

/// Identifier wrapper for reviewer roster entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewerId(pub String);

/// Identifier wrapper for assignment slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub String);

impl std::fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subtype distinguishing the two exemption review procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExemptionSubtype {
    Experimental,
    Documentary,
}

/// Research category of a protocol, governing reviewer count and instruments.
///
/// Free-form codes only exist at the boundary; everything past
/// [`ResearchType::from_codes`] works with the typed variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "subtype", rename_all = "kebab-case")]
pub enum ResearchType {
    SocialBehavioral,
    PublicHealth,
    HealthOperations,
    Biomedical,
    Exemption(ExemptionSubtype),
}

impl ResearchType {
    /// Parse the wire codes used by intake forms and the HTTP surface.
    ///
    /// The subtype is required for exemption protocols and rejected for
    /// every other code.
    pub fn from_codes(code: &str, subtype: Option<&str>) -> Result<Self, ValidationError> {
        let parsed = match code.trim() {
            "social/behavioral" => Self::SocialBehavioral,
            "public-health" => Self::PublicHealth,
            "health-operations" => Self::HealthOperations,
            "biomedical" => Self::Biomedical,
            "exemption" => {
                let subtype = subtype
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .ok_or(ValidationError::MissingExemptionSubtype)?;
                match subtype {
                    "experimental" => Self::Exemption(ExemptionSubtype::Experimental),
                    "documentary" => Self::Exemption(ExemptionSubtype::Documentary),
                    other => {
                        return Err(ValidationError::UnknownExemptionSubtype(other.to_string()))
                    }
                }
            }
            other => return Err(ValidationError::UnknownResearchType(other.to_string())),
        };

        if !matches!(parsed, Self::Exemption(_)) {
            if let Some(extra) = subtype.map(str::trim).filter(|value| !value.is_empty()) {
                return Err(ValidationError::UnexpectedSubtype {
                    code: code.trim().to_string(),
                    subtype: extra.to_string(),
                });
            }
        }

        Ok(parsed)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::SocialBehavioral => "social/behavioral",
            Self::PublicHealth => "public-health",
            Self::HealthOperations => "health-operations",
            Self::Biomedical => "biomedical",
            Self::Exemption(_) => "exemption",
        }
    }

    pub const fn category(self) -> ResearchCategory {
        match self {
            Self::SocialBehavioral => ResearchCategory::SocialBehavioral,
            Self::PublicHealth => ResearchCategory::PublicHealth,
            Self::HealthOperations => ResearchCategory::HealthOperations,
            Self::Biomedical => ResearchCategory::Biomedical,
            Self::Exemption(_) => ResearchCategory::Exemption,
        }
    }

    pub const fn is_exemption(self) -> bool {
        matches!(self, Self::Exemption(_))
    }
}

/// Payload-free mirror of [`ResearchType`] used in reviewer preference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResearchCategory {
    SocialBehavioral,
    PublicHealth,
    HealthOperations,
    Biomedical,
    Exemption,
}

/// Procedural review track declared on the protocol; affects deadline length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewTrack {
    FullBoard,
    Expedited,
}

/// The named form or checklist a reviewer must complete for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentInstrument {
    Review,
    InformedConsent,
    IacucReview,
    ExemptionChecklist,
}

impl AssessmentInstrument {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::InformedConsent => "informed-consent",
            Self::IacucReview => "iacuc-review",
            Self::ExemptionChecklist => "exemption-checklist",
        }
    }
}

/// Lifecycle of a single assignment slot. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    Pending,
    Completed,
}

/// Minimal protocol projection the engine reads: category, track, status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRecord {
    pub id: ProtocolId,
    pub title: String,
    pub research_type: ResearchType,
    pub review_track: Option<ReviewTrack>,
    pub status: ProtocolStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolStatus {
    Submitted,
    UnderReview,
    Decided,
}

/// Roster entry for one reviewer.
///
/// `current_load` counts active, non-completed slots across all protocols
/// and is mutated only through the load deltas carried by store commands,
/// never directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerProfile {
    pub id: ReviewerId,
    pub display_name: String,
    pub short_code: String,
    pub active: bool,
    pub current_load: u32,
    pub max_load: u32,
    pub expertise: Vec<String>,
    pub specializations: Vec<String>,
    pub preferred_categories: Vec<ResearchCategory>,
    pub total_reviewed: u32,
}

/// One (protocol, position, reviewer, instrument, deadline) binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSlot {
    pub id: SlotId,
    pub protocol: ProtocolId,
    pub reviewer: ReviewerId,
    pub instrument: AssessmentInstrument,
    pub position: u8,
    pub research_type: ResearchType,
    pub assigned_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: ReviewStatus,
    pub reassigned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_reviewer: Option<ReviewerId>,
}

impl AssignmentSlot {
    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.deadline < now
    }
}

/// Immutable audit entry for one reviewer swap. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReassignmentRecord {
    pub protocol: ProtocolId,
    pub slot: SlotId,
    pub position: u8,
    pub instrument: AssessmentInstrument,
    pub previous_reviewer: ReviewerId,
    pub new_reviewer: ReviewerId,
    pub original_deadline: DateTime<Utc>,
    pub new_deadline: DateTime<Utc>,
    pub reason: String,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
    pub days_overdue: i64,
}

/// Snapshot of one overdue slot produced by a detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueSummary {
    pub slot: SlotId,
    pub reviewer: ReviewerId,
    pub instrument: AssessmentInstrument,
    pub position: u8,
    pub deadline: DateTime<Utc>,
    pub days_overdue: i64,
}

/// Immutable record of one detection pass. Append-only raw event log:
/// repeated scans append repeated entries, so entry counts do not equal
/// unique overdue incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueScanEntry {
    pub protocol: ProtocolId,
    pub overdue: Vec<OverdueSummary>,
    pub scanned_at: DateTime<Utc>,
}

/// In-progress work product a reviewer keeps while a slot is open.
/// Purged when the slot is reassigned away from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub protocol: ProtocolId,
    pub reviewer: ReviewerId,
    pub instrument: AssessmentInstrument,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}
