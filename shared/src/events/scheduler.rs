use std::time::Duration;

use log::debug;

use crate::events::condition::{ConditionSource, EventCondition};

/// Identifies one pending deferred event, for cancellation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(u64);

struct PendingEvent<K, D> {
    key: EventKey,
    deadline: Duration,
    condition: Option<EventCondition>,
    kind: K,
    data: D,
}

/// Deferred events waiting for their deadline. Driven by `tick`; nothing
/// here suspends. Cancelling an event just removes it.
pub struct EventScheduler<K, D> {
    // front due first, ties in scheduling order
    pending: Vec<PendingEvent<K, D>>,
    next_key: u64,
}

impl<K, D> EventScheduler<K, D> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_key: 0,
        }
    }

    pub fn schedule(
        &mut self,
        kind: K,
        data: D,
        deadline: Duration,
        condition: Option<EventCondition>,
    ) -> EventKey {
        let key = EventKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);

        let index = self
            .pending
            .partition_point(|pending| pending.deadline <= deadline);
        self.pending.insert(
            index,
            PendingEvent {
                key,
                deadline,
                condition,
                kind,
                data,
            },
        );

        key
    }

    /// Removes a pending event. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, key: &EventKey) -> bool {
        let Some(index) = self.pending.iter().position(|pending| &pending.key == key) else {
            return false;
        };
        self.pending.remove(index);
        true
    }

    pub fn is_pending(&self, key: &EventKey) -> bool {
        self.pending.iter().any(|pending| &pending.key == key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.first().map(|pending| pending.deadline)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pops every event whose deadline is at or before `now`, in deadline
    /// order. Events whose condition does not hold are dropped.
    pub fn tick(&mut self, now: Duration, conditions: &dyn ConditionSource) -> Vec<(EventKey, K, D)> {
        let due = self
            .pending
            .partition_point(|pending| pending.deadline <= now);

        let mut output = Vec::with_capacity(due);
        for pending in self.pending.drain(..due) {
            if let Some(condition) = &pending.condition {
                if !condition.holds(conditions) {
                    debug!(
                        "Deferred event {:?} dropped: condition {} is not {}",
                        pending.key, condition.index, condition.expected
                    );
                    continue;
                }
            }
            output.push((pending.key, pending.kind, pending.data));
        }
        output
    }
}

impl<K, D> Default for EventScheduler<K, D> {
    fn default() -> Self {
        Self::new()
    }
}
