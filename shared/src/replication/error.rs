use thiserror::Error;

/// Errors returned when creating a replicator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicatorError {
    /// Replicator ID 0 is reserved for "empty" and is never assigned
    #[error("Replicator ID 0 is reserved and cannot be assigned")]
    ReservedId,

    /// Another live replicator of the same State type already uses this ID
    #[error("Replicator ID {id} has already been assigned for this State type")]
    DuplicateId { id: u32 },

    /// The lifetime tag does not name a known LifeTime
    #[error("LifeTime tag {tag} is invalid")]
    InvalidLifetime { tag: u8 },

    /// The State type was never added to the Protocol
    #[error("State `{state_name}` not registered with Protocol. Must call `add_state()` during protocol initialization")]
    StateNotRegistered { state_name: &'static str },
}

/// Errors raised while classifying a State type into a wire bucket
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The State type is larger than the largest payload bucket
    #[error("State `{state_name}` is {byte_size} bytes, larger than the {max}-byte maximum payload")]
    StateTooLarge {
        state_name: &'static str,
        byte_size: usize,
        max: usize,
    },
}

/// Errors raised while handling an inbound message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// No registered State type owns this channel
    #[error("Channel `{channel}` is not registered with Protocol")]
    UnknownChannel { channel: String },

    /// The payload length does not match the State type's wire bucket
    #[error("Payload on channel `{channel}` is {actual} bytes, expected {expected}")]
    MalformedPayload {
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// The payload had the right length but its bits did not decode
    #[error("Payload on channel `{channel}` could not be decoded")]
    Decode { channel: String },
}
