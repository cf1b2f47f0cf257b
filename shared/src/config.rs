use std::default::Default;

/// Which live replicators answer a joining peer's sync request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakePolicy {
    /// Every valid replicator, Session or Permanent
    AllValid,
    /// Only Session replicators recorded by the type's handshake tracker
    SessionOnly,
}

/// Contains Config properties which will be used by a ReplicationContext
#[derive(Clone, Debug)]
pub struct ReplicationConfig {
    /// Decides which replicators are sent as drop-in state to a joining peer
    pub handshake_policy: HandshakePolicy,
    /// When true, session teardown also discards the checkpoints of the
    /// Session replicators it unloads. Otherwise snapshots outlive their
    /// replicators and recalling them is a no-op.
    pub prune_snapshots_on_teardown: bool,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            handshake_policy: HandshakePolicy::AllValid,
            prune_snapshots_on_teardown: false,
        }
    }
}
