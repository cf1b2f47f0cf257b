use crate::types::PeerId;

/// Addressee of an outgoing message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SendTarget {
    /// The peer currently acting as master
    Master,
    /// Every remote peer in the session
    All,
    /// One remote peer
    Peer(PeerId),
}

/// The session layer as seen by the replication core: a fire-and-forget
/// send primitive plus an oracle telling who the master is. Peer identity,
/// reliable delivery and master election all live behind this seam.
pub trait Transport {
    /// Identity of the local peer
    fn local_peer(&self) -> PeerId;

    /// Identity of the peer currently acting as master, if one is known
    fn master(&self) -> Option<PeerId>;

    /// Queues `payload` on `channel` for delivery to `target`. No
    /// acknowledgement is reported back.
    fn send(&mut self, target: SendTarget, channel: &str, payload: Vec<u8>);

    fn is_master(&self) -> bool {
        self.master() == Some(self.local_peer())
    }
}

/// Transport for a session with no remote peers. The local peer is always
/// master and everything sent is discarded.
pub struct OfflineTransport {
    local_peer: PeerId,
}

impl OfflineTransport {
    pub fn new(local_peer: PeerId) -> Self {
        Self { local_peer }
    }
}

impl Default for OfflineTransport {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Transport for OfflineTransport {
    fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    fn master(&self) -> Option<PeerId> {
        Some(self.local_peer)
    }

    fn send(&mut self, _target: SendTarget, _channel: &str, _payload: Vec<u8>) {}
}
