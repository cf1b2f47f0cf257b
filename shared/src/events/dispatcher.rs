use std::{fmt::Debug, hash::Hash, time::Duration};

use log::{debug, warn};

use crate::{
    events::{
        condition::{ConditionSource, EventCondition},
        error::EventError,
        event_handler::EventHandler,
        event_kinds::EventKinds,
        scheduler::{EventKey, EventScheduler},
    },
    types::PeerRole,
};

/// When an event should fire, relative to the moment it was raised
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventTiming {
    /// Configured delay of the event
    pub delay: Duration,
    /// Time already spent in the sequence that raised it
    pub elapsed: Duration,
}

impl EventTiming {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn after(delay: Duration) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.delay.saturating_sub(self.elapsed)
    }
}

/// Outcome of dispatching one event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// The handler ran straight away
    Triggered,
    /// The condition did not hold; nothing ran
    Skipped,
    /// Deferred until its deadline
    Scheduled(EventKey),
}

/// Event kind table plus the deferred-event scheduler that feeds it
pub struct EventDispatcher<K: Copy + Eq + Hash + Debug, D> {
    kinds: EventKinds<K, D>,
    scheduler: EventScheduler<K, D>,
}

impl<K: Copy + Eq + Hash + Debug, D> EventDispatcher<K, D> {
    pub fn new(kinds: EventKinds<K, D>) -> Self {
        Self {
            kinds,
            scheduler: EventScheduler::new(),
        }
    }

    pub fn kinds(&self) -> &EventKinds<K, D> {
        &self.kinds
    }

    pub fn scheduler(&self) -> &EventScheduler<K, D> {
        &self.scheduler
    }

    pub fn try_add_handler<H: EventHandler<D> + 'static>(
        &mut self,
        kind: K,
        handler: H,
    ) -> Result<&mut Self, EventError> {
        self.kinds.try_add_handler(kind, handler)?;
        Ok(self)
    }

    /// Raises an event at time `now`. Fires it immediately when no time
    /// remains and its condition holds, otherwise defers it.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch(
        &mut self,
        kind: K,
        data: D,
        timing: EventTiming,
        condition: Option<EventCondition>,
        now: Duration,
        conditions: &dyn ConditionSource,
        role: PeerRole,
    ) -> Result<Dispatched, EventError> {
        if !self.kinds.contains(&kind) {
            return Err(EventError::UnregisteredKind {
                kind: format!("{:?}", kind),
            });
        }

        let remaining = timing.remaining();
        if remaining > Duration::ZERO {
            // saturates at Duration::MAX
            let deadline = now.saturating_add(remaining);
            let key = self.scheduler.schedule(kind, data, deadline, condition);
            return Ok(Dispatched::Scheduled(key));
        }

        if let Some(condition) = &condition {
            if !condition.holds(conditions) {
                debug!("Event {:?} skipped: condition {} is not {}", kind, condition.index, condition.expected);
                return Ok(Dispatched::Skipped);
            }
        }

        self.kinds.trigger(&kind, &data, role)?;
        Ok(Dispatched::Triggered)
    }

    /// Fires every deferred event due at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Duration, conditions: &dyn ConditionSource, role: PeerRole) -> usize {
        let mut triggered = 0;
        for (key, kind, data) in self.scheduler.tick(now, conditions) {
            match self.kinds.trigger(&kind, &data, role) {
                Ok(()) => triggered += 1,
                Err(err) => warn!("Deferred event {:?} not triggered: {}", key, err),
            }
        }
        triggered
    }

    pub fn cancel(&mut self, key: &EventKey) -> bool {
        self.scheduler.cancel(key)
    }

    /// Drops every pending event, e.g. on session teardown
    pub fn clear(&mut self) {
        self.scheduler.clear();
    }
}
