use std::sync::{Arc, RwLock, Weak};

use log::warn;

use crate::replication::state::State;

/// Notified synchronously whenever an accepted change is applied to the
/// replicator it is attached to
pub trait ReplicatorHolder<S: State> {
    fn on_state_change(&mut self, old_state: &S, new_state: &S, is_recall: bool);
}

/// Non-owning handle to a holder. The replicator never keeps its holder
/// alive; once the holder is dropped notifications silently stop.
pub struct HolderHandle<S: State> {
    inner: Weak<RwLock<dyn ReplicatorHolder<S>>>,
}

impl<S: State> HolderHandle<S> {
    pub fn new<H: ReplicatorHolder<S> + 'static>(holder: &Arc<RwLock<H>>) -> Self {
        let holder: Arc<RwLock<dyn ReplicatorHolder<S>>> = holder.clone();
        Self {
            inner: Arc::downgrade(&holder),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub(crate) fn notify(&self, old_state: &S, new_state: &S, is_recall: bool) {
        let Some(holder) = self.inner.upgrade() else {
            return;
        };
        let Ok(mut holder) = holder.write() else {
            warn!("Holder lock for `{}` is poisoned, skipping state change notification", S::short_name());
            return;
        };
        holder.on_state_change(old_state, new_state, is_recall);
    }
}

impl<S: State> Clone for HolderHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
