/// Session-scoped identifier of one replicator within one value type.
/// `0` is reserved and never assigned.
pub type ReplicatorId = u32;

/// Identity of a peer as reported by the session layer
pub type PeerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerRole {
    Master,
    Client,
}

impl PeerRole {
    pub fn is_master(self) -> bool {
        matches!(self, PeerRole::Master)
    }
}
