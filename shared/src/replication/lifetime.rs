use crate::replication::error::ReplicatorError;

/// Governs how long a replicator lives and whether it takes part in
/// handshake catch-up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifeTime {
    /// Lives until process end. Assumed consistent on every peer by
    /// construction, e.g. derived from a shared deterministic seed.
    Permanent,
    /// Created and destroyed with the session, replayed to joining peers
    Session,
}

impl LifeTime {
    pub fn tag(self) -> u8 {
        match self {
            LifeTime::Permanent => 0,
            LifeTime::Session => 1,
        }
    }
}

impl TryFrom<u8> for LifeTime {
    type Error = ReplicatorError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(LifeTime::Permanent),
            1 => Ok(LifeTime::Session),
            _ => Err(ReplicatorError::InvalidLifetime { tag }),
        }
    }
}
