use std::marker::PhantomData;

use crate::{
    replication::{holder::HolderHandle, lifetime::LifeTime, state::State},
    types::ReplicatorId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplicatorStatus {
    Active,
    Unloaded,
}

/// One replicated value of State type `S`
pub struct Replicator<S: State> {
    id: ReplicatorId,
    lifetime: LifeTime,
    state: S,
    holder: Option<HolderHandle<S>>,
    status: ReplicatorStatus,
}

impl<S: State> Replicator<S> {
    pub(crate) fn new(
        id: ReplicatorId,
        state: S,
        lifetime: LifeTime,
        holder: Option<HolderHandle<S>>,
    ) -> Self {
        Self {
            id,
            lifetime,
            state,
            holder,
            status: ReplicatorStatus::Active,
        }
    }

    pub fn id(&self) -> ReplicatorId {
        self.id
    }

    pub fn lifetime(&self) -> LifeTime {
        self.lifetime
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn status(&self) -> ReplicatorStatus {
        self.status
    }

    pub fn is_valid(&self) -> bool {
        self.status == ReplicatorStatus::Active
    }

    pub fn has_holder(&self) -> bool {
        self.holder.is_some()
    }

    /// Overwrites the value and notifies the holder, if any
    pub(crate) fn change_state(&mut self, new_state: S, is_recall: bool) {
        let old_state = std::mem::replace(&mut self.state, new_state);
        if let Some(holder) = &self.holder {
            holder.notify(&old_state, &self.state, is_recall);
        }
    }

    pub(crate) fn unload(&mut self) {
        self.status = ReplicatorStatus::Unloaded;
        self.holder = None;
    }

    pub fn handle(&self) -> ReplicatorHandle<S> {
        ReplicatorHandle::new(self.id, self.lifetime)
    }
}

/// Lightweight, copyable reference to a created replicator. Operations go
/// through the owning ReplicationContext.
pub struct ReplicatorHandle<S: State> {
    id: ReplicatorId,
    lifetime: LifeTime,
    phantom_s: PhantomData<fn() -> S>,
}

impl<S: State> ReplicatorHandle<S> {
    pub(crate) fn new(id: ReplicatorId, lifetime: LifeTime) -> Self {
        Self {
            id,
            lifetime,
            phantom_s: PhantomData,
        }
    }

    pub fn id(&self) -> ReplicatorId {
        self.id
    }

    pub fn lifetime(&self) -> LifeTime {
        self.lifetime
    }
}

impl<S: State> Clone for ReplicatorHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State> Copy for ReplicatorHandle<S> {}

impl<S: State> std::fmt::Debug for ReplicatorHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicatorHandle")
            .field("state", &S::short_name())
            .field("id", &self.id)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl<S: State> PartialEq for ReplicatorHandle<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.lifetime == other.lifetime
    }
}

impl<S: State> Eq for ReplicatorHandle<S> {}
