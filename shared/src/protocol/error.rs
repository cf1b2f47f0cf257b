use thiserror::Error;

use crate::replication::error::PayloadError;

/// Errors that can occur while registering State types with the Protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The same State type was added twice
    #[error("State `{state_name}` has already been added to the Protocol")]
    DuplicateState { state_name: &'static str },

    /// A generated channel name is already owned by another State type
    #[error("Channel `{channel}` collides with a channel of another State type")]
    ChannelCollision { channel: String },

    /// The State type cannot be carried by any payload bucket
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
