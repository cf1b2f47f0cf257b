use std::{any::Any, collections::HashMap, fmt};

use crate::{
    replication::state::{State, StateKind},
    types::ReplicatorId,
};

/// Name of a checkpoint buffer values are captured into and recalled from
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckpointTag(String);

impl CheckpointTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CheckpointTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CheckpointTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for CheckpointTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SnapshotKey {
    kind: StateKind,
    id: ReplicatorId,
    tag: CheckpointTag,
}

/// Saved copies of replicator values, keyed by (State type, replicator id,
/// checkpoint tag). Independent of the live registries: an entry may outlive
/// the replicator it was taken from.
pub struct SnapshotStore {
    snapshots: HashMap<SnapshotKey, Box<dyn Any + Send + Sync>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
        }
    }

    /// Saves a copy of `state`, replacing any earlier capture under the
    /// same key
    pub fn save<S: State>(&mut self, id: ReplicatorId, tag: &CheckpointTag, state: &S) {
        let key = SnapshotKey {
            kind: StateKind::of::<S>(),
            id,
            tag: tag.clone(),
        };
        self.snapshots.insert(key, Box::new(state.clone()));
    }

    pub fn load<S: State>(&self, id: ReplicatorId, tag: &CheckpointTag) -> Option<&S> {
        let key = SnapshotKey {
            kind: StateKind::of::<S>(),
            id,
            tag: tag.clone(),
        };
        self.snapshots
            .get(&key)
            .and_then(|snapshot| snapshot.downcast_ref::<S>())
    }

    pub fn contains<S: State>(&self, id: ReplicatorId, tag: &CheckpointTag) -> bool {
        self.load::<S>(id, tag).is_some()
    }

    /// Drops every checkpoint of one replicator
    pub fn remove_replicator(&mut self, kind: StateKind, id: ReplicatorId) -> usize {
        let before = self.snapshots.len();
        self.snapshots
            .retain(|key, _| !(key.kind == kind && key.id == id));
        before - self.snapshots.len()
    }

    /// Drops every value captured under `tag`, across all State types
    pub fn remove_tag(&mut self, tag: &CheckpointTag) -> usize {
        let before = self.snapshots.len();
        self.snapshots.retain(|key, _| &key.tag != tag);
        before - self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
