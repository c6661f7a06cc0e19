use super::types::Direction;

/// Holds the committed direction and the latest valid request for the next
/// tick. Several requests between two ticks collapse into the last valid one.
#[derive(Clone, Debug)]
pub struct DirectionQueue {
    current: Direction,
    queued: Direction,
}

impl DirectionQueue {
    pub fn new(initial: Direction) -> Self {
        Self {
            current: initial,
            queued: initial,
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn queued(&self) -> Direction {
        self.queued
    }

    /// Returns false when `requested` reverses the committed direction; the
    /// request is then dropped.
    pub fn submit(&mut self, requested: Direction) -> bool {
        if requested.is_opposite(&self.current) {
            return false;
        }
        self.queued = requested;
        true
    }

    pub fn commit(&mut self) -> Direction {
        self.current = self.queued;
        self.current
    }
}
