//! Task model.
//!
//! A task is a unit of work executed by exactly one robot, starting at
//! one discrete slot and occupying `duration` consecutive slots.

use serde::{Deserialize, Serialize};

/// Discrete time slot (start origin of a task).
pub type Slot = u32;

/// A task to be scheduled.
///
/// # Time Representation
/// Durations are measured in slots. A task started at slot `s` occupies
/// slots `s, s + 1, ..., s + duration - 1` and completes at `s + duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task name.
    pub name: String,
    /// Processing duration in slots.
    #[serde(alias = "p")]
    pub duration: u32,
}

impl Task {
    /// Creates a new task.
    pub fn new(name: impl Into<String>, duration: u32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    /// Completion time when started at `start`.
    #[inline]
    pub fn completion(&self, start: Slot) -> u64 {
        u64::from(start) + u64::from(self.duration)
    }

    /// Whether a start at `start` keeps the task busy during `slot`.
    ///
    /// This is the occupancy window `start <= slot < start + duration`.
    #[inline]
    pub fn occupies(&self, start: Slot, slot: Slot) -> bool {
        start <= slot && u64::from(slot) < self.completion(start)
    }

    /// Start slots (among `slots`) that keep the task busy during `slot`.
    pub fn window<'a>(&'a self, slots: &'a [Slot], slot: Slot) -> impl Iterator<Item = Slot> + 'a {
        slots.iter().copied().filter(move |&s| self.occupies(s, slot))
    }
}
