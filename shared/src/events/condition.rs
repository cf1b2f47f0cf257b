/// Host-side lookup of world condition flags
pub trait ConditionSource {
    fn condition(&self, index: i32) -> bool;
}

/// Predicate attached to an event: the flag at `index` must equal
/// `expected` when the event comes due
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventCondition {
    pub index: i32,
    pub expected: bool,
}

impl EventCondition {
    pub fn new(index: i32, expected: bool) -> Self {
        Self { index, expected }
    }

    pub fn holds(&self, source: &dyn ConditionSource) -> bool {
        source.condition(self.index) == self.expected
    }
}

/// A ConditionSource where every flag reads false
pub struct NoConditions;

impl ConditionSource for NoConditions {
    fn condition(&self, _index: i32) -> bool {
        false
    }
}

impl<F: Fn(i32) -> bool> ConditionSource for F {
    fn condition(&self, index: i32) -> bool {
        self(index)
    }
}
