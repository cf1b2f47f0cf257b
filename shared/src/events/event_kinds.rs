use std::{collections::HashMap, fmt::Debug, hash::Hash};

use crate::{
    events::{error::EventError, event_handler::EventHandler},
    types::PeerRole,
};

/// Explicit event kind -> handler table, built once at startup. A kind can
/// be claimed by exactly one handler.
pub struct EventKinds<K: Copy + Eq + Hash + Debug, D> {
    handlers: HashMap<K, Box<dyn EventHandler<D>>>,
}

impl<K: Copy + Eq + Hash + Debug, D> EventKinds<K, D> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `kind`
    ///
    /// # Panics
    ///
    /// Panics if `kind` already has a handler.
    /// Consider using `try_add_handler` for non-panicking error handling.
    pub fn add_handler<H: EventHandler<D> + 'static>(&mut self, kind: K, handler: H) -> &mut Self {
        if let Err(err) = self.try_add_handler(kind, handler) {
            panic!("{}", err);
        }
        self
    }

    /// Register a handler for `kind`
    ///
    /// Returns an error, keeping the existing handler, if `kind` is taken.
    pub fn try_add_handler<H: EventHandler<D> + 'static>(
        &mut self,
        kind: K,
        handler: H,
    ) -> Result<&mut Self, EventError> {
        if let Some(existing) = self.handlers.get(&kind) {
            return Err(EventError::DuplicateKind {
                kind: format!("{:?}", kind),
                existing: existing.name(),
                incoming: handler.name(),
            });
        }

        self.handlers.insert(kind, Box::new(handler));
        Ok(self)
    }

    pub fn contains(&self, kind: &K) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn trigger(&mut self, kind: &K, data: &D, role: PeerRole) -> Result<(), EventError> {
        let handler = self
            .handlers
            .get_mut(kind)
            .ok_or_else(|| EventError::UnregisteredKind {
                kind: format!("{:?}", kind),
            })?;
        handler.trigger(data, role);
        Ok(())
    }
}

impl<K: Copy + Eq + Hash + Debug, D> Default for EventKinds<K, D> {
    fn default() -> Self {
        Self::new()
    }
}
