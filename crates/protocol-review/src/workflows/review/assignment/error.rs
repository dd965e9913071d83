use super::domain::{ProtocolId, ReviewerId, SlotId};
use super::repository::RepositoryError;

/// Input rejected before any write was attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown research type code '{0}'")]
    UnknownResearchType(String),
    #[error("exemption protocols require an 'experimental' or 'documentary' subtype")]
    MissingExemptionSubtype,
    #[error("unknown exemption subtype '{0}'")]
    UnknownExemptionSubtype(String),
    #[error("research type '{code}' does not take a subtype (got '{subtype}')")]
    UnexpectedSubtype { code: String, subtype: String },
    #[error("{label} requires exactly {required} reviewers, got {provided}")]
    ReviewerCountMismatch {
        label: String,
        required: usize,
        provided: usize,
    },
    #[error("reviewer {0} is listed more than once")]
    DuplicateReviewer(ReviewerId),
    #[error("reviewer {0} does not exist or is not accepting assignments")]
    ReviewerNotEligible(ReviewerId),
    #[error("reviewer {0} already holds an open slot on this protocol")]
    ReviewerAlreadyAssigned(ReviewerId),
    #[error("a reassignment reason must be provided")]
    BlankReason,
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("protocol {0} not found")]
    Protocol(ProtocolId),
    #[error("assignment slot {0} not found")]
    Slot(SlotId),
    #[error("reviewer {0} not found or inactive")]
    Reviewer(ReviewerId),
}

/// Caller-visible failure of an assignment-engine operation.
///
/// Every operation surfaces one of these four kinds; the engine never logs
/// and returns a default in place of an error.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("assignments for protocol {0} were modified concurrently")]
    Conflict(ProtocolId),
    #[error("storage failure: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for AssignmentError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::VersionConflict { protocol, .. } => Self::Conflict(protocol),
            RepositoryError::NotFound(what) => {
                Self::Persistence(format!("referenced record vanished mid-write: {what}"))
            }
            RepositoryError::Unavailable(detail) => Self::Persistence(detail),
        }
    }
}
