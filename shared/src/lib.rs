//! # Stateline Shared
//! State replication shared by every peer of a session: any peer may
//! propose a change to a replicated value, only the master's decision
//! becomes ground truth, joining peers catch up from drop-in state, and
//! values can be captured to and recalled from named checkpoints.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use stateline_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
};

mod config;
mod context;
mod events;
mod protocol;
mod replication;
mod transport;
mod types;

pub use config::{HandshakePolicy, ReplicationConfig};
pub use context::{ReplicationContext, Signal};
pub use events::{
    condition::{ConditionSource, EventCondition, NoConditions},
    dispatcher::{Dispatched, EventDispatcher, EventTiming},
    error::EventError,
    event_handler::EventHandler,
    event_kinds::EventKinds,
    scheduler::{EventKey, EventScheduler},
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use replication::{
    channel_names::{ChannelNames, ChannelRole},
    error::{PayloadError, ReceiveError, ReplicatorError},
    handshake::ReplicatorHandshake,
    holder::{HolderHandle, ReplicatorHolder},
    lifetime::LifeTime,
    payload::{PayloadSize, REPLICATOR_ID_BYTES},
    registry::ReplicatorRegistry,
    replicator::{Replicator, ReplicatorHandle, ReplicatorStatus},
    snapshot::{CheckpointTag, SnapshotStore},
    state::{State, StateKind},
};
pub use transport::{OfflineTransport, SendTarget, Transport};
pub use types::{PeerId, PeerRole, ReplicatorId};
