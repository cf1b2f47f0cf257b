pub mod channel_names;
pub mod error;
pub mod handshake;
pub mod holder;
pub mod lifetime;
pub mod payload;
pub mod registry;
pub mod replicator;
pub mod snapshot;
pub mod state;
