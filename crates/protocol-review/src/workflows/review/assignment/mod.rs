//! Reviewer assignment and reassignment engine.
//!
//! Decides how many reviewers a protocol needs and which assessment
//! instrument each position receives, tracks reviewer workload, detects
//! overdue slots, and swaps reviewers while keeping the slot set, both load
//! counters, and the audit trail consistent. All writes go through the
//! [`ReviewStore`] command boundary so a concurrent chairperson action on
//! the same protocol is rejected instead of double-applied.

pub mod clock;
pub(crate) mod directory;
pub mod domain;
mod error;
pub mod memory;
mod overdue;
pub mod policy;
mod reassignment;
mod registry;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use directory::{rank_reviewers, required_expertise, RankFactor, RankSignal, RankedReviewer};
pub use domain::{
    AssessmentDraft, AssessmentInstrument, AssignmentSlot, ExemptionSubtype, OverdueScanEntry,
    OverdueSummary, ProtocolId, ProtocolRecord, ProtocolStatus, ReassignmentRecord,
    ResearchCategory, ResearchType, ReviewStatus, ReviewTrack, ReviewerId, ReviewerProfile,
    SlotId,
};
pub use error::{AssignmentError, NotFoundError, ValidationError};
pub use memory::InMemoryReviewStore;
pub use policy::{
    assignment_policy, fallback_window_days, review_window_days, AssignmentPolicy,
    REASSIGNMENT_GRACE_DAYS,
};
pub use repository::{
    AssignmentSet, DraftKey, LoadDelta, ReassignmentWrite, RemoveSlots, ReplaceAssignments,
    RepositoryError, ReviewStore,
};
pub use router::assignment_router;
pub use service::ReviewAssignmentService;
