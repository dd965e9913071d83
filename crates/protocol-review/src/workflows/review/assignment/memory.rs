use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::domain::{
    AssessmentDraft, AssignmentSlot, OverdueScanEntry, ProtocolId, ProtocolRecord,
    ReassignmentRecord, ReviewerId, ReviewerProfile,
};
use super::repository::{
    AssignmentSet, DraftKey, LoadDelta, ReassignmentWrite, RemoveSlots, ReplaceAssignments,
    RepositoryError, ReviewStore,
};

#[derive(Default)]
struct StoreState {
    protocols: HashMap<ProtocolId, ProtocolRecord>,
    reviewers: BTreeMap<ReviewerId, ReviewerProfile>,
    slots: HashMap<ProtocolId, Vec<AssignmentSlot>>,
    versions: HashMap<ProtocolId, u64>,
    reassignments: Vec<ReassignmentRecord>,
    scans: Vec<OverdueScanEntry>,
    drafts: HashMap<DraftKey, AssessmentDraft>,
}

/// Single-process [`ReviewStore`] used by the API binary, the demo command,
/// and the tests. One mutex across each command gives the atomicity and
/// serialization the trait contract demands.
#[derive(Default)]
pub struct InMemoryReviewStore {
    state: Mutex<StoreState>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a protocol record.
    pub fn put_protocol(&self, record: ProtocolRecord) {
        let mut state = self.lock();
        state.protocols.insert(record.id.clone(), record);
    }

    /// Seed or replace a reviewer profile.
    pub fn put_reviewer(&self, profile: ReviewerProfile) {
        let mut state = self.lock();
        state.reviewers.insert(profile.id.clone(), profile);
    }

    /// Seed an in-progress draft, keyed by (protocol, reviewer, instrument).
    pub fn put_draft(&self, draft: AssessmentDraft) {
        let mut state = self.lock();
        let key = DraftKey {
            protocol: draft.protocol.clone(),
            reviewer: draft.reviewer.clone(),
            instrument: draft.instrument,
        };
        state.drafts.insert(key, draft);
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("review store mutex poisoned")
    }
}

fn check_version(
    state: &StoreState,
    protocol: &ProtocolId,
    expected: u64,
) -> Result<(), RepositoryError> {
    let found = state.versions.get(protocol).copied().unwrap_or(0);
    if found != expected {
        return Err(RepositoryError::VersionConflict {
            protocol: protocol.clone(),
            expected,
            found,
        });
    }
    Ok(())
}

fn check_delta_targets(state: &StoreState, deltas: &[LoadDelta]) -> Result<(), RepositoryError> {
    for delta in deltas {
        if !state.reviewers.contains_key(&delta.reviewer) {
            return Err(RepositoryError::NotFound(format!(
                "reviewer {}",
                delta.reviewer
            )));
        }
    }
    Ok(())
}

fn apply_deltas(state: &mut StoreState, deltas: &[LoadDelta]) {
    for delta in deltas {
        if let Some(profile) = state.reviewers.get_mut(&delta.reviewer) {
            if delta.delta < 0 {
                profile.current_load =
                    profile.current_load.saturating_sub(delta.delta.unsigned_abs());
            } else {
                profile.current_load += delta.delta as u32;
            }
        }
    }
}

fn bump_version(state: &mut StoreState, protocol: &ProtocolId) {
    *state.versions.entry(protocol.clone()).or_insert(0) += 1;
}

impl ReviewStore for InMemoryReviewStore {
    fn protocol(&self, id: &ProtocolId) -> Result<Option<ProtocolRecord>, RepositoryError> {
        Ok(self.lock().protocols.get(id).cloned())
    }

    fn reviewer(&self, id: &ReviewerId) -> Result<Option<ReviewerProfile>, RepositoryError> {
        Ok(self.lock().reviewers.get(id).cloned())
    }

    fn roster(&self) -> Result<Vec<ReviewerProfile>, RepositoryError> {
        Ok(self.lock().reviewers.values().cloned().collect())
    }

    fn assignments(&self, protocol: &ProtocolId) -> Result<AssignmentSet, RepositoryError> {
        let state = self.lock();
        Ok(AssignmentSet {
            slots: state.slots.get(protocol).cloned().unwrap_or_default(),
            version: state.versions.get(protocol).copied().unwrap_or(0),
        })
    }

    fn reassignment_history(
        &self,
        protocol: &ProtocolId,
    ) -> Result<Vec<ReassignmentRecord>, RepositoryError> {
        Ok(self
            .lock()
            .reassignments
            .iter()
            .filter(|record| &record.protocol == protocol)
            .cloned()
            .collect())
    }

    fn scan_log(&self, protocol: &ProtocolId) -> Result<Vec<OverdueScanEntry>, RepositoryError> {
        Ok(self
            .lock()
            .scans
            .iter()
            .filter(|entry| &entry.protocol == protocol)
            .cloned()
            .collect())
    }

    fn draft(&self, key: &DraftKey) -> Result<Option<AssessmentDraft>, RepositoryError> {
        Ok(self.lock().drafts.get(key).cloned())
    }

    fn replace_assignments(
        &self,
        command: ReplaceAssignments,
    ) -> Result<Vec<AssignmentSlot>, RepositoryError> {
        let mut state = self.lock();
        check_version(&state, &command.protocol, command.expected_version)?;
        check_delta_targets(&state, &command.load_deltas)?;

        state
            .slots
            .insert(command.protocol.clone(), command.slots.clone());
        apply_deltas(&mut state, &command.load_deltas);
        bump_version(&mut state, &command.protocol);

        Ok(command.slots)
    }

    fn remove_slots(&self, command: RemoveSlots) -> Result<usize, RepositoryError> {
        let mut state = self.lock();
        check_version(&state, &command.protocol, command.expected_version)?;
        check_delta_targets(&state, &command.load_deltas)?;

        let removed = match state.slots.get_mut(&command.protocol) {
            Some(slots) => {
                let before = slots.len();
                slots.retain(|slot| !command.slot_ids.contains(&slot.id));
                before - slots.len()
            }
            None => 0,
        };

        apply_deltas(&mut state, &command.load_deltas);
        bump_version(&mut state, &command.protocol);

        Ok(removed)
    }

    fn apply_reassignment(
        &self,
        command: ReassignmentWrite,
    ) -> Result<AssignmentSlot, RepositoryError> {
        let mut state = self.lock();
        check_version(&state, &command.protocol, command.expected_version)?;
        check_delta_targets(&state, &command.load_deltas)?;

        let slots = state
            .slots
            .get_mut(&command.protocol)
            .ok_or_else(|| RepositoryError::NotFound(format!("slot {}", command.slot.id)))?;
        let target = slots
            .iter_mut()
            .find(|slot| slot.id == command.slot.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("slot {}", command.slot.id)))?;
        *target = command.slot.clone();

        apply_deltas(&mut state, &command.load_deltas);
        state.drafts.remove(&command.purge_draft);
        state.reassignments.push(command.record);
        bump_version(&mut state, &command.protocol);

        Ok(command.slot)
    }

    fn append_scan_entry(&self, entry: OverdueScanEntry) -> Result<(), RepositoryError> {
        self.lock().scans.push(entry);
        Ok(())
    }
}
