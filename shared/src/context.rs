use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    config::ReplicationConfig,
    protocol::Protocol,
    replication::{
        channel_names::ChannelRole,
        error::{ReceiveError, ReplicatorError},
        holder::HolderHandle,
        lifetime::LifeTime,
        registry::{ErasedRegistry, ReplicatorRegistry},
        replicator::ReplicatorHandle,
        snapshot::{CheckpointTag, SnapshotStore},
        state::{State, StateKind},
    },
    transport::Transport,
    types::{PeerId, ReplicatorId},
};

/// External signals the replication core reacts to for the lifetime of a
/// context
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// A peer joined (or rejoined) and needs drop-in state
    PeerJoined(PeerId),
    /// The host captured a checkpoint buffer
    CheckpointCaptured(CheckpointTag),
    /// The host rewound to a checkpoint buffer
    CheckpointRecalled(CheckpointTag),
    /// The session ended; Session replicators go away
    SessionTeardown,
}

/// One peer's replication state: a registry per State type of the Protocol,
/// the checkpoint store and the transport those registries talk through.
/// Several contexts can coexist in one process.
pub struct ReplicationContext {
    config: ReplicationConfig,
    kinds: Vec<StateKind>,
    registries: HashMap<StateKind, Box<dyn ErasedRegistry>>,
    channels: HashMap<String, (StateKind, ChannelRole)>,
    snapshots: SnapshotStore,
    transport: Box<dyn Transport>,
}

impl ReplicationContext {
    pub fn new<T: Transport + 'static>(
        config: ReplicationConfig,
        protocol: Protocol,
        transport: T,
    ) -> Self {
        Self {
            config,
            kinds: protocol.kinds,
            registries: protocol.registries,
            channels: protocol.channels,
            snapshots: SnapshotStore::new(),
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn transport_mut(&mut self) -> &mut dyn Transport {
        self.transport.as_mut()
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn local_peer(&self) -> PeerId {
        self.transport.local_peer()
    }

    pub fn is_master(&self) -> bool {
        self.transport.is_master()
    }

    // Registries

    pub fn registry<S: State>(&self) -> Option<&ReplicatorRegistry<S>> {
        self.registries
            .get(&StateKind::of::<S>())
            .and_then(|registry| registry.as_any().downcast_ref::<ReplicatorRegistry<S>>())
    }

    fn registry_mut<S: State>(
        registries: &mut HashMap<StateKind, Box<dyn ErasedRegistry>>,
    ) -> Result<&mut ReplicatorRegistry<S>, ReplicatorError> {
        registries
            .get_mut(&StateKind::of::<S>())
            .and_then(|registry| registry.as_any_mut().downcast_mut::<ReplicatorRegistry<S>>())
            .ok_or(ReplicatorError::StateNotRegistered {
                state_name: S::full_name(),
            })
    }

    pub fn state<S: State>(&self, id: ReplicatorId) -> Option<&S> {
        self.registry::<S>().and_then(|registry| registry.state(&id))
    }

    // Replicators

    pub fn create<S: State>(
        &mut self,
        id: ReplicatorId,
        state: S,
        lifetime: LifeTime,
        holder: Option<HolderHandle<S>>,
    ) -> Result<ReplicatorHandle<S>, ReplicatorError> {
        Self::registry_mut::<S>(&mut self.registries)?.create(id, state, lifetime, holder)
    }

    pub fn create_with_tag<S: State>(
        &mut self,
        id: ReplicatorId,
        state: S,
        lifetime_tag: u8,
        holder: Option<HolderHandle<S>>,
    ) -> Result<ReplicatorHandle<S>, ReplicatorError> {
        Self::registry_mut::<S>(&mut self.registries)?.create_with_tag(id, state, lifetime_tag, holder)
    }

    /// Proposes a new value for a replicator. Only the master's decision
    /// becomes ground truth; on other peers the local value changes once
    /// the master's broadcast arrives.
    pub fn request_change<S: State>(&mut self, id: ReplicatorId, state: S) {
        match Self::registry_mut::<S>(&mut self.registries) {
            Ok(registry) => registry.request_change(self.transport.as_mut(), id, state),
            Err(err) => warn!("Dropping change request: {}", err),
        }
    }

    pub fn unload<S: State>(&mut self, id: ReplicatorId) -> bool {
        match Self::registry_mut::<S>(&mut self.registries) {
            Ok(registry) => registry.unload(&id),
            Err(_) => false,
        }
    }

    // Inbound

    /// Routes a message delivered by the transport to the State type owning
    /// `channel`. Unknown replicator ids and authority mismatches are logged
    /// and dropped; only undecodable traffic is reported as an error.
    pub fn receive(
        &mut self,
        sender: PeerId,
        channel: &str,
        payload: &[u8],
    ) -> Result<(), ReceiveError> {
        let Some((kind, role)) = self.channels.get(channel).copied() else {
            return Err(ReceiveError::UnknownChannel {
                channel: channel.to_string(),
            });
        };
        let Some(registry) = self.registries.get_mut(&kind) else {
            return Err(ReceiveError::UnknownChannel {
                channel: channel.to_string(),
            });
        };

        registry
            .receive(
                self.transport.as_mut(),
                sender,
                channel,
                role,
                payload,
                self.config.handshake_policy,
            )
            .map_err(|err| {
                warn!("Dropping `{}` message from peer {}: {}", registry.state_name(), sender, err);
                err
            })
    }

    // Signals

    pub fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::PeerJoined(peer) => {
                self.on_peer_joined(peer);
            }
            Signal::CheckpointCaptured(tag) => {
                self.capture(&tag);
            }
            Signal::CheckpointRecalled(tag) => {
                self.recall(&tag);
            }
            Signal::SessionTeardown => {
                self.teardown_session();
            }
        }
    }

    /// Unicasts drop-in state of every State type to `peer`. Returns the
    /// number of messages sent.
    pub fn on_peer_joined(&mut self, peer: PeerId) -> usize {
        let mut sent = 0;
        for kind in &self.kinds {
            if let Some(registry) = self.registries.get(kind) {
                sent += registry.on_sync_requested(
                    self.transport.as_mut(),
                    peer,
                    self.config.handshake_policy,
                );
            }
        }
        debug!("Sent {} drop-in states to peer {}", sent, peer);
        sent
    }

    /// Asks the master for drop-in state of every State type
    pub fn request_sync(&mut self) {
        if self.transport.master().is_none() {
            warn!("Cannot request sync: no master known");
            return;
        }
        for kind in &self.kinds {
            if let Some(registry) = self.registries.get(kind) {
                registry.request_sync(self.transport.as_mut());
            }
        }
    }

    /// Saves the value of every live replicator, of every State type,
    /// under `tag`
    pub fn capture(&mut self, tag: &CheckpointTag) -> usize {
        let mut captured = 0;
        for kind in &self.kinds {
            if let Some(registry) = self.registries.get(kind) {
                captured += registry.capture(&mut self.snapshots, tag);
            }
        }
        debug!("Captured {} replicators into checkpoint `{}`", captured, tag);
        captured
    }

    /// Restores every live replicator that was captured under `tag`; holders
    /// are notified with `is_recall` set
    pub fn recall(&mut self, tag: &CheckpointTag) -> usize {
        let mut recalled = 0;
        for kind in &self.kinds {
            if let Some(registry) = self.registries.get_mut(kind) {
                recalled += registry.recall(&self.snapshots, tag);
            }
        }
        debug!("Recalled {} replicators from checkpoint `{}`", recalled, tag);
        recalled
    }

    /// Unloads every Session replicator of every State type and resets the
    /// handshake trackers. Permanent replicators are untouched.
    pub fn teardown_session(&mut self) -> usize {
        let mut unloaded = 0;
        for kind in &self.kinds {
            if let Some(registry) = self.registries.get_mut(kind) {
                let snapshots = if self.config.prune_snapshots_on_teardown {
                    Some(&mut self.snapshots)
                } else {
                    None
                };
                unloaded += registry.teardown_session(snapshots);
            }
        }
        unloaded
    }
}
