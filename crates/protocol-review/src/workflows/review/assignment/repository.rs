use super::domain::{
    AssessmentDraft, AssessmentInstrument, AssignmentSlot, OverdueScanEntry, ProtocolId,
    ProtocolRecord, ReassignmentRecord, ReviewerId, ReviewerProfile, SlotId,
};

/// A protocol's slot set together with the version stamp used for
/// optimistic concurrency control. Every mutating command must carry the
/// version observed at read time; the store rejects stale writes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSet {
    pub slots: Vec<AssignmentSlot>,
    pub version: u64,
}

/// Signed adjustment to one reviewer's `current_load`. Negative deltas
/// saturate at zero rather than underflowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDelta {
    pub reviewer: ReviewerId,
    pub delta: i32,
}

/// Identifies one reviewer's in-progress draft for one slot instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub protocol: ProtocolId,
    pub reviewer: ReviewerId,
    pub instrument: AssessmentInstrument,
}

/// Clear-and-insert of a protocol's whole slot set plus the matching load
/// bookkeeping, applied as one unit.
#[derive(Debug, Clone)]
pub struct ReplaceAssignments {
    pub protocol: ProtocolId,
    pub expected_version: u64,
    pub slots: Vec<AssignmentSlot>,
    pub load_deltas: Vec<LoadDelta>,
}

/// Removal of specific slots plus the matching load decrements.
#[derive(Debug, Clone)]
pub struct RemoveSlots {
    pub protocol: ProtocolId,
    pub expected_version: u64,
    pub slot_ids: Vec<SlotId>,
    pub load_deltas: Vec<LoadDelta>,
}

/// The four-record reviewer swap: slot update, two load adjustments, audit
/// record append, and draft purge, applied as one unit.
#[derive(Debug, Clone)]
pub struct ReassignmentWrite {
    pub protocol: ProtocolId,
    pub expected_version: u64,
    pub slot: AssignmentSlot,
    pub record: ReassignmentRecord,
    pub load_deltas: Vec<LoadDelta>,
    pub purge_draft: DraftKey,
}

/// Storage boundary for the assignment engine.
///
/// Reads are plain lookups. Writes are composite commands: an
/// implementation must apply each command atomically (all records or none)
/// and must fail with [`RepositoryError::VersionConflict`] when the
/// command's `expected_version` no longer matches the protocol's stored
/// version. A database-backed implementation wraps each command in a
/// transaction; the in-memory store holds one lock across the whole
/// command.
pub trait ReviewStore: Send + Sync {
    fn protocol(&self, id: &ProtocolId) -> Result<Option<ProtocolRecord>, RepositoryError>;
    fn reviewer(&self, id: &ReviewerId) -> Result<Option<ReviewerProfile>, RepositoryError>;
    fn roster(&self) -> Result<Vec<ReviewerProfile>, RepositoryError>;
    fn assignments(&self, protocol: &ProtocolId) -> Result<AssignmentSet, RepositoryError>;
    fn reassignment_history(
        &self,
        protocol: &ProtocolId,
    ) -> Result<Vec<ReassignmentRecord>, RepositoryError>;
    fn scan_log(&self, protocol: &ProtocolId) -> Result<Vec<OverdueScanEntry>, RepositoryError>;
    fn draft(&self, key: &DraftKey) -> Result<Option<AssessmentDraft>, RepositoryError>;

    fn replace_assignments(
        &self,
        command: ReplaceAssignments,
    ) -> Result<Vec<AssignmentSlot>, RepositoryError>;
    fn remove_slots(&self, command: RemoveSlots) -> Result<usize, RepositoryError>;
    fn apply_reassignment(
        &self,
        command: ReassignmentWrite,
    ) -> Result<AssignmentSlot, RepositoryError>;
    fn append_scan_entry(&self, entry: OverdueScanEntry) -> Result<(), RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "assignments for protocol {protocol} changed concurrently \
         (expected version {expected}, found {found})"
    )]
    VersionConflict {
        protocol: ProtocolId,
        expected: u64,
        found: u64,
    },
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
