use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::directory::{rank_reviewers, RankedReviewer};
use super::domain::{
    AssignmentSlot, OverdueScanEntry, OverdueSummary, ProtocolId, ReassignmentRecord,
    ResearchType, ReviewerId, SlotId,
};
use super::error::AssignmentError;
use super::repository::ReviewStore;
use super::{overdue, reassignment, registry};

/// Facade over the assignment registry, overdue detector, reassignment
/// coordinator, and reviewer directory, constructed with an injected store
/// so callers and tests choose the persistence backend.
pub struct ReviewAssignmentService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ReviewAssignmentService<S>
where
    S: ReviewStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create the policy-sized slot set for a protocol, replacing any
    /// existing set. Calling twice with the same inputs leaves one set and
    /// correctly balanced reviewer loads.
    pub fn assign(
        &self,
        protocol: &ProtocolId,
        reviewer_ids: Vec<ReviewerId>,
        research: ResearchType,
    ) -> Result<Vec<AssignmentSlot>, AssignmentError> {
        registry::assign(
            self.store.as_ref(),
            self.clock.as_ref(),
            protocol,
            reviewer_ids,
            research,
        )
    }

    /// Remove every slot for a protocol, releasing reviewer load.
    pub fn clear(&self, protocol: &ProtocolId) -> Result<(), AssignmentError> {
        registry::clear(self.store.as_ref(), protocol)
    }

    pub fn list(&self, protocol: &ProtocolId) -> Result<Vec<AssignmentSlot>, AssignmentError> {
        registry::list(self.store.as_ref(), protocol)
    }

    /// Flag pending slots past their deadline, appending one scan entry to
    /// the audit log.
    pub fn scan_overdue(
        &self,
        protocol: &ProtocolId,
    ) -> Result<Vec<OverdueSummary>, AssignmentError> {
        overdue::scan(self.store.as_ref(), self.clock.as_ref(), protocol)
    }

    /// Delete overdue slots, returning how many were removed.
    pub fn remove_overdue(&self, protocol: &ProtocolId) -> Result<usize, AssignmentError> {
        overdue::remove_overdue(self.store.as_ref(), self.clock.as_ref(), protocol)
    }

    /// Swap the reviewer on one slot, with audit trail, load bookkeeping,
    /// and purge of the outgoing reviewer's draft.
    pub fn reassign(
        &self,
        protocol: &ProtocolId,
        slot: &SlotId,
        new_reviewer: &ReviewerId,
        reason: &str,
        actor: &str,
    ) -> Result<AssignmentSlot, AssignmentError> {
        reassignment::reassign(
            self.store.as_ref(),
            self.clock.as_ref(),
            protocol,
            slot,
            new_reviewer,
            reason,
            actor,
        )
    }

    /// Rank the whole roster for a protocol. Soft ordering only; callers
    /// enforce eligibility when they actually assign.
    pub fn recommend(
        &self,
        research: ResearchType,
        keywords: &[String],
    ) -> Result<Vec<RankedReviewer>, AssignmentError> {
        let roster = self.store.roster()?;
        Ok(rank_reviewers(&roster, research, keywords))
    }

    pub fn reassignment_history(
        &self,
        protocol: &ProtocolId,
    ) -> Result<Vec<ReassignmentRecord>, AssignmentError> {
        Ok(self.store.reassignment_history(protocol)?)
    }

    pub fn scan_log(
        &self,
        protocol: &ProtocolId,
    ) -> Result<Vec<OverdueScanEntry>, AssignmentError> {
        Ok(self.store.scan_log(protocol)?)
    }
}
