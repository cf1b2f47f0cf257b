use std::collections::BTreeSet;

use log::debug;

use crate::{config::HandshakePolicy, replication::lifetime::LifeTime, types::ReplicatorId};

/// Per-State-type record of the Session replicators created since the last
/// reset. Idle when the set is empty.
pub struct ReplicatorHandshake {
    name: String,
    known_ids: BTreeSet<ReplicatorId>,
}

impl ReplicatorHandshake {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            known_ids: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_session_create(&mut self, id: ReplicatorId) {
        self.known_ids.insert(id);
    }

    pub fn reset(&mut self) {
        if !self.known_ids.is_empty() {
            debug!(
                "Handshake `{}` reset, forgetting {} session replicators",
                self.name,
                self.known_ids.len()
            );
        }
        self.known_ids.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.known_ids.is_empty()
    }

    pub fn is_known(&self, id: &ReplicatorId) -> bool {
        self.known_ids.contains(id)
    }

    pub fn known_ids(&self) -> impl Iterator<Item = &ReplicatorId> {
        self.known_ids.iter()
    }

    /// Whether a live replicator is replayed to a joining peer under `policy`
    pub fn should_replay(
        &self,
        policy: HandshakePolicy,
        id: &ReplicatorId,
        lifetime: LifeTime,
    ) -> bool {
        match policy {
            HandshakePolicy::AllValid => true,
            HandshakePolicy::SessionOnly => lifetime == LifeTime::Session && self.is_known(id),
        }
    }
}
