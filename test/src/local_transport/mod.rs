/// In-memory transport for E2E testing
/// Routes messages between peers of one process without network I/O

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use log::trace;

use stateline_shared::{PeerId, SendTarget, Transport};

/// One queued message, as the receiving peer will see it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub sender: PeerId,
    pub channel: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct HubState {
    master: Option<PeerId>,
    inboxes: BTreeMap<PeerId, VecDeque<Envelope>>,
}

/// Shared session every LocalTransport of a test sends through. Owns the
/// per-peer inboxes and decides who the master is.
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins `peer` to the session and hands back its transport
    pub fn connect(&self, peer: PeerId) -> LocalTransport {
        self.state
            .lock()
            .unwrap()
            .inboxes
            .entry(peer)
            .or_default();
        LocalTransport {
            hub: self.clone(),
            local_peer: peer,
        }
    }

    /// Removes `peer` and drops everything still queued for it
    pub fn disconnect(&self, peer: PeerId) {
        let mut state = self.state.lock().unwrap();
        state.inboxes.remove(&peer);
        if state.master == Some(peer) {
            state.master = None;
        }
    }

    pub fn set_master(&self, master: Option<PeerId>) {
        self.state.lock().unwrap().master = master;
    }

    pub fn master(&self) -> Option<PeerId> {
        self.state.lock().unwrap().master
    }

    pub fn peers(&self) -> Vec<PeerId> {
        self.state.lock().unwrap().inboxes.keys().copied().collect()
    }

    /// Takes every message queued for `peer`, oldest first
    pub fn drain(&self, peer: PeerId) -> Vec<Envelope> {
        let mut state = self.state.lock().unwrap();
        match state.inboxes.get_mut(&peer) {
            Some(inbox) => inbox.drain(..).collect(),
            None => Vec::new(),
        }
    }

    pub fn pending(&self, peer: PeerId) -> usize {
        self.state
            .lock()
            .unwrap()
            .inboxes
            .get(&peer)
            .map_or(0, VecDeque::len)
    }

    pub fn is_idle(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .inboxes
            .values()
            .all(VecDeque::is_empty)
    }

    fn deliver(&self, sender: PeerId, target: SendTarget, channel: &str, payload: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        let recipients: Vec<PeerId> = match target {
            SendTarget::Master => state.master.into_iter().collect(),
            SendTarget::All => state.inboxes.keys().copied().collect(),
            SendTarget::Peer(peer) => vec![peer],
        };

        for recipient in recipients {
            if recipient == sender {
                continue;
            }
            let Some(inbox) = state.inboxes.get_mut(&recipient) else {
                trace!("Dropping message on `{}` for disconnected peer {}", channel, recipient);
                continue;
            };
            inbox.push_back(Envelope {
                sender,
                channel: channel.to_string(),
                payload: payload.clone(),
            });
        }
    }
}

/// Transport of one peer, backed by a LocalHub
pub struct LocalTransport {
    hub: LocalHub,
    local_peer: PeerId,
}

impl LocalTransport {
    pub fn hub(&self) -> &LocalHub {
        &self.hub
    }
}

impl Transport for LocalTransport {
    fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    fn master(&self) -> Option<PeerId> {
        self.hub.master()
    }

    fn send(&mut self, target: SendTarget, channel: &str, payload: Vec<u8>) {
        self.hub.deliver(self.local_peer, target, channel, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_skips_sender() {
        let hub = LocalHub::new();
        let mut a = hub.connect(1);
        hub.connect(2);
        hub.connect(3);

        a.send(SendTarget::All, "chan", vec![1]);

        assert_eq!(hub.pending(1), 0);
        assert_eq!(hub.pending(2), 1);
        assert_eq!(hub.pending(3), 1);
    }

    #[test]
    fn master_target_follows_hub() {
        let hub = LocalHub::new();
        let mut a = hub.connect(1);
        hub.connect(2);

        a.send(SendTarget::Master, "chan", vec![1]);
        assert!(hub.is_idle());

        hub.set_master(Some(2));
        a.send(SendTarget::Master, "chan", vec![2]);
        let delivered = hub.drain(2);
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].sender, 1);
        assert_eq!(delivered[0].payload, vec![2]);
    }
}
