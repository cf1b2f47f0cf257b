use thiserror::Error;

/// Errors that can occur while building or using the event table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Two handlers claimed the same event kind
    #[error("Duplicate handler for event kind {kind}: '{existing}' is already registered, '{incoming}' was rejected")]
    DuplicateKind {
        kind: String,
        existing: &'static str,
        incoming: &'static str,
    },

    /// No handler is registered for the event kind
    #[error("Event kind {kind} has no registered handler")]
    UnregisteredKind { kind: String },
}
