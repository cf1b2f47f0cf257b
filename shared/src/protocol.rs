use std::collections::HashMap;

use log::info;

use crate::replication::{
    channel_names::ChannelRole,
    registry::{ErasedRegistry, ReplicatorRegistry},
    state::{State, StateKind},
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

// Protocol
/// The set of State types a session replicates, collected at bootstrap.
/// Every peer must build an identical Protocol.
pub struct Protocol {
    pub(crate) kinds: Vec<StateKind>,
    pub(crate) registries: HashMap<StateKind, Box<dyn ErasedRegistry>>,
    pub(crate) channels: HashMap<String, (StateKind, ChannelRole)>,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            kinds: Vec::new(),
            registries: HashMap::new(),
            channels: HashMap::new(),
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        plugin.build(self);
        self
    }

    /// Registers a State type
    ///
    /// # Panics
    ///
    /// Panics if the type is too large for any payload bucket, was already
    /// added, or its channel names collide with another type's.
    /// Consider using `try_add_state` for non-panicking error handling.
    pub fn add_state<S: State>(&mut self) -> &mut Self {
        if let Err(err) = self.try_add_state::<S>() {
            panic!("Cannot add State to Protocol: {}", err);
        }
        self
    }

    /// Registers a State type: classifies its payload bucket, derives its
    /// channel names and creates its empty registry. Nothing is registered
    /// on failure.
    pub fn try_add_state<S: State>(&mut self) -> Result<&mut Self, ProtocolError> {
        let kind = StateKind::of::<S>();
        if self.registries.contains_key(&kind) {
            return Err(ProtocolError::DuplicateState {
                state_name: S::full_name(),
            });
        }

        let registry = ReplicatorRegistry::<S>::new()?;
        for (_, channel) in registry.channel_names().iter() {
            if self.channels.contains_key(channel) {
                return Err(ProtocolError::ChannelCollision {
                    channel: channel.to_string(),
                });
            }
        }

        for (role, channel) in registry.channel_names().iter() {
            self.channels.insert(channel.to_string(), (kind, role));
        }
        info!(
            "Registered State `{}` ({} bytes, {:?} payload)",
            S::full_name(),
            S::byte_size(),
            registry.payload_size()
        );
        self.kinds.push(kind);
        self.registries.insert(kind, Box::new(registry));

        Ok(self)
    }

    pub fn has_state<S: State>(&self) -> bool {
        self.registries.contains_key(&StateKind::of::<S>())
    }

    pub fn state_count(&self) -> usize {
        self.kinds.len()
    }

    /// Channel table lookup: which State type and role own `channel`
    pub fn channel(&self, channel: &str) -> Option<(StateKind, ChannelRole)> {
        self.channels.get(channel).copied()
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
