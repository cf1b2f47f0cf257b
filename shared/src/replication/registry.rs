use std::{any::Any, collections::BTreeMap};

use log::{debug, info, warn};

use crate::{
    config::HandshakePolicy,
    replication::{
        channel_names::{ChannelNames, ChannelRole},
        error::{PayloadError, ReceiveError, ReplicatorError},
        handshake::ReplicatorHandshake,
        holder::HolderHandle,
        lifetime::LifeTime,
        payload::PayloadSize,
        replicator::{Replicator, ReplicatorHandle},
        snapshot::{CheckpointTag, SnapshotStore},
        state::{State, StateKind},
    },
    transport::{SendTarget, Transport},
    types::{PeerId, ReplicatorId},
};

/// Owns every live replicator of one State type and enforces the authority
/// rules for changing them.
///
/// Callbacks run while this registry is being iterated (holder notifications
/// during recall, for instance) must not create or unload replicators of the
/// same State type.
pub struct ReplicatorRegistry<S: State> {
    channels: ChannelNames,
    payload_size: PayloadSize,
    replicators: BTreeMap<ReplicatorId, Replicator<S>>,
    handshake: ReplicatorHandshake,
}

impl<S: State> ReplicatorRegistry<S> {
    pub fn new() -> Result<Self, PayloadError> {
        let payload_size = PayloadSize::for_state::<S>()?;
        let channels = ChannelNames::of::<S>();
        let handshake = ReplicatorHandshake::new(channels.handshake());

        Ok(Self {
            channels,
            payload_size,
            replicators: BTreeMap::new(),
            handshake,
        })
    }

    pub fn channel_names(&self) -> &ChannelNames {
        &self.channels
    }

    pub fn payload_size(&self) -> PayloadSize {
        self.payload_size
    }

    pub fn handshake(&self) -> &ReplicatorHandshake {
        &self.handshake
    }

    // Creation

    pub fn create(
        &mut self,
        id: ReplicatorId,
        state: S,
        lifetime: LifeTime,
        holder: Option<HolderHandle<S>>,
    ) -> Result<ReplicatorHandle<S>, ReplicatorError> {
        self.check_id(id)?;
        Ok(self.insert(id, state, lifetime, holder))
    }

    /// Like `create`, for callers holding a raw lifetime tag. The tag is
    /// validated after the id, and nothing is stored on any failure.
    pub fn create_with_tag(
        &mut self,
        id: ReplicatorId,
        state: S,
        lifetime_tag: u8,
        holder: Option<HolderHandle<S>>,
    ) -> Result<ReplicatorHandle<S>, ReplicatorError> {
        self.check_id(id)?;
        let lifetime = LifeTime::try_from(lifetime_tag).map_err(|err| {
            warn!("LifeTime is invalid!: {}", lifetime_tag);
            err
        })?;
        Ok(self.insert(id, state, lifetime, holder))
    }

    fn check_id(&self, id: ReplicatorId) -> Result<(), ReplicatorError> {
        if id == 0 {
            warn!("Replicator ID 0 is reserved for `{}`", S::short_name());
            return Err(ReplicatorError::ReservedId);
        }
        if self.replicators.contains_key(&id) {
            warn!(
                "Replicator ID {} has already been assigned for `{}`",
                id,
                S::short_name()
            );
            return Err(ReplicatorError::DuplicateId { id });
        }
        Ok(())
    }

    fn insert(
        &mut self,
        id: ReplicatorId,
        state: S,
        lifetime: LifeTime,
        holder: Option<HolderHandle<S>>,
    ) -> ReplicatorHandle<S> {
        match lifetime {
            LifeTime::Permanent => {
                debug!(
                    "Replicator {} of `{}` is Permanent :: handshake tracking disabled",
                    id,
                    S::short_name()
                );
            }
            LifeTime::Session => {
                self.handshake.on_session_create(id);
            }
        }

        let replicator = Replicator::new(id, state, lifetime, holder);
        let handle = replicator.handle();
        self.replicators.insert(id, replicator);
        handle
    }

    // Queries

    pub fn get(&self, id: &ReplicatorId) -> Option<&Replicator<S>> {
        self.replicators.get(id)
    }

    pub fn state(&self, id: &ReplicatorId) -> Option<&S> {
        self.replicators.get(id).map(Replicator::state)
    }

    pub fn contains(&self, id: &ReplicatorId) -> bool {
        self.replicators.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.replicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicators.is_empty()
    }

    /// Live replicators in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Replicator<S>> {
        self.replicators.values()
    }

    // Changes

    /// Proposes a new value. The master applies and broadcasts it at once;
    /// any other peer forwards it to the master and waits for the broadcast.
    pub fn request_change(&mut self, transport: &mut dyn Transport, id: ReplicatorId, state: S) {
        if !self.replicators.contains_key(&id) {
            warn!(
                "Cannot request change of unknown replicator {} of `{}`",
                id,
                S::short_name()
            );
            return;
        }

        if transport.is_master() {
            self.apply_and_broadcast(transport, id, state);
            return;
        }

        if transport.master().is_none() {
            warn!(
                "No master known, dropping change request for replicator {} of `{}`",
                id,
                S::short_name()
            );
            return;
        }

        let payload = self.payload_size.encode(id, &state);
        transport.send(SendTarget::Master, self.channels.client_request(), payload);
    }

    pub fn on_client_request(
        &mut self,
        transport: &mut dyn Transport,
        sender: PeerId,
        id: ReplicatorId,
        state: S,
    ) {
        if !transport.is_master() {
            warn!(
                "Ignoring client request from peer {} for `{}`: local peer is not master",
                sender,
                S::short_name()
            );
            return;
        }

        self.apply_and_broadcast(transport, id, state);
    }

    pub fn on_master_set_state(
        &mut self,
        transport: &dyn Transport,
        sender: PeerId,
        id: ReplicatorId,
        state: S,
        is_recall: bool,
    ) {
        if transport.master() != Some(sender) {
            warn!(
                "Ignoring `{}` state from peer {}: it is not the current master",
                S::short_name(),
                sender
            );
            return;
        }

        self.apply_change(id, state, is_recall);
    }

    fn apply_and_broadcast(&mut self, transport: &mut dyn Transport, id: ReplicatorId, state: S) {
        if !self.apply_change(id, state, false) {
            return;
        }
        let Some(state) = self.state(&id) else {
            return;
        };
        let payload = self.payload_size.encode(id, state);
        transport.send(SendTarget::All, self.channels.master_set_state(), payload);
    }

    /// Overwrites the value of a live replicator and notifies its holder.
    /// Returns false, after logging, if no replicator has this id.
    pub fn apply_change(&mut self, id: ReplicatorId, state: S, is_recall: bool) -> bool {
        let Some(replicator) = self.replicators.get_mut(&id) else {
            warn!(
                "Received state for unknown replicator {} of `{}`",
                id,
                S::short_name()
            );
            return false;
        };

        replicator.change_state(state, is_recall);
        true
    }

    // Lifecycle

    /// Marks the replicator Unloaded and removes it. Returns false if it was
    /// already gone.
    pub fn unload(&mut self, id: &ReplicatorId) -> bool {
        match self.replicators.remove(id) {
            Some(mut replicator) => {
                replicator.unload();
                true
            }
            None => false,
        }
    }

    /// Unloads every Session replicator, keeps Permanent ones, and resets
    /// the handshake tracker. Returns the unloaded ids.
    pub fn teardown_session(&mut self) -> Vec<ReplicatorId> {
        let session_ids: Vec<ReplicatorId> = self
            .replicators
            .values()
            .filter(|replicator| replicator.lifetime() == LifeTime::Session)
            .map(Replicator::id)
            .collect();

        for id in &session_ids {
            self.unload(id);
        }
        self.handshake.reset();

        if !session_ids.is_empty() {
            info!(
                "Session teardown unloaded {} replicators of `{}`",
                session_ids.len(),
                S::short_name()
            );
        }

        session_ids
    }

    // Handshake

    /// Unicasts the current value of every replicator selected by `policy`
    /// to `peer` as drop-in state. Returns how many were sent.
    pub fn on_sync_requested(
        &self,
        transport: &mut dyn Transport,
        peer: PeerId,
        policy: HandshakePolicy,
    ) -> usize {
        if peer == transport.local_peer() {
            return 0;
        }

        let mut sent = 0;
        for replicator in self.replicators.values() {
            if !replicator.is_valid()
                || !self
                    .handshake
                    .should_replay(policy, &replicator.id(), replicator.lifetime())
            {
                continue;
            }
            let payload = self.payload_size.encode(replicator.id(), replicator.state());
            transport.send(
                SendTarget::Peer(peer),
                self.channels.master_set_recall_state(),
                payload,
            );
            sent += 1;
        }
        sent
    }

    /// Sends an empty sync request for this State type to the master
    pub fn request_sync(&self, transport: &mut dyn Transport) {
        if transport.is_master() || transport.master().is_none() {
            return;
        }
        transport.send(SendTarget::Master, self.channels.handshake(), Vec::new());
    }

    // Snapshots

    pub fn capture(&self, snapshots: &mut SnapshotStore, tag: &CheckpointTag) -> usize {
        let mut captured = 0;
        for replicator in self.replicators.values().filter(|r| r.is_valid()) {
            snapshots.save::<S>(replicator.id(), tag, replicator.state());
            captured += 1;
        }
        captured
    }

    /// Restores every live replicator that has a value saved under `tag`.
    /// Replicators without one are left untouched.
    pub fn recall(&mut self, snapshots: &SnapshotStore, tag: &CheckpointTag) -> usize {
        let mut recalled = 0;
        for replicator in self.replicators.values_mut().filter(|r| r.is_valid()) {
            let Some(saved) = snapshots.load::<S>(replicator.id(), tag) else {
                continue;
            };
            replicator.change_state(saved.clone(), true);
            recalled += 1;
        }
        recalled
    }

    // Inbound

    pub fn receive(
        &mut self,
        transport: &mut dyn Transport,
        sender: PeerId,
        channel: &str,
        role: ChannelRole,
        payload: &[u8],
        policy: HandshakePolicy,
    ) -> Result<(), ReceiveError> {
        if role == ChannelRole::Handshake {
            if !transport.is_master() {
                debug!(
                    "Ignoring `{}` sync request from peer {}: local peer is not master",
                    S::short_name(),
                    sender
                );
                return Ok(());
            }
            self.on_sync_requested(transport, sender, policy);
            return Ok(());
        }

        let (id, state) = self.payload_size.decode::<S>(channel, payload)?;
        match role {
            ChannelRole::ClientRequest => self.on_client_request(transport, sender, id, state),
            ChannelRole::MasterSetState => {
                self.on_master_set_state(transport, sender, id, state, false)
            }
            ChannelRole::MasterSetRecallState => {
                self.on_master_set_state(transport, sender, id, state, true)
            }
            ChannelRole::Handshake => {}
        }
        Ok(())
    }
}

/// Type-erased view of a ReplicatorRegistry, so a ReplicationContext can fan
/// signals out across every registered State type
pub(crate) trait ErasedRegistry {
    fn state_name(&self) -> &'static str;
    fn receive(
        &mut self,
        transport: &mut dyn Transport,
        sender: PeerId,
        channel: &str,
        role: ChannelRole,
        payload: &[u8],
        policy: HandshakePolicy,
    ) -> Result<(), ReceiveError>;
    fn on_sync_requested(
        &self,
        transport: &mut dyn Transport,
        peer: PeerId,
        policy: HandshakePolicy,
    ) -> usize;
    fn request_sync(&self, transport: &mut dyn Transport);
    fn capture(&self, snapshots: &mut SnapshotStore, tag: &CheckpointTag) -> usize;
    fn recall(&mut self, snapshots: &SnapshotStore, tag: &CheckpointTag) -> usize;
    fn teardown_session(&mut self, snapshots: Option<&mut SnapshotStore>) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: State> ErasedRegistry for ReplicatorRegistry<S> {
    fn state_name(&self) -> &'static str {
        S::full_name()
    }

    fn receive(
        &mut self,
        transport: &mut dyn Transport,
        sender: PeerId,
        channel: &str,
        role: ChannelRole,
        payload: &[u8],
        policy: HandshakePolicy,
    ) -> Result<(), ReceiveError> {
        ReplicatorRegistry::receive(self, transport, sender, channel, role, payload, policy)
    }

    fn on_sync_requested(
        &self,
        transport: &mut dyn Transport,
        peer: PeerId,
        policy: HandshakePolicy,
    ) -> usize {
        ReplicatorRegistry::on_sync_requested(self, transport, peer, policy)
    }

    fn request_sync(&self, transport: &mut dyn Transport) {
        ReplicatorRegistry::request_sync(self, transport)
    }

    fn capture(&self, snapshots: &mut SnapshotStore, tag: &CheckpointTag) -> usize {
        ReplicatorRegistry::capture(self, snapshots, tag)
    }

    fn recall(&mut self, snapshots: &SnapshotStore, tag: &CheckpointTag) -> usize {
        ReplicatorRegistry::recall(self, snapshots, tag)
    }

    fn teardown_session(&mut self, snapshots: Option<&mut SnapshotStore>) -> usize {
        let unloaded = ReplicatorRegistry::teardown_session(self);
        if let Some(snapshots) = snapshots {
            for id in &unloaded {
                snapshots.remove_replicator(StateKind::of::<S>(), *id);
            }
        }
        unloaded.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
