//! Problem instance: robots, slots, tasks, and precedence edges.
//!
//! The instance is the single input to model construction. It is
//! validated on load; an instance that fails validation never reaches
//! the variable registry.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{Precedence, Slot, Task};
use crate::error::QuboError;
use crate::validation::validate_instance;

/// A multi-robot scheduling problem over discrete time slots.
///
/// # JSON Format
/// ```json
/// {
///   "robots": ["R1", "R2"],
///   "slots": [0, 1, 2, 3],
///   "tasks": [{"name": "A", "p": 2}, {"name": "B", "p": 1}],
///   "precedence": [["A", "B"]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Robot labels, in order.
    pub robots: Vec<String>,
    /// Candidate start slots, in order.
    pub slots: Vec<Slot>,
    /// Tasks, in order.
    pub tasks: Vec<Task>,
    /// Precedence edges.
    #[serde(default)]
    pub precedence: Vec<Precedence>,
}

impl ProblemInstance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a robot.
    pub fn with_robot(mut self, label: impl Into<String>) -> Self {
        self.robots.push(label.into());
        self
    }

    /// Adds slots.
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Adds a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a precedence edge `before -> after`.
    pub fn with_precedence(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.precedence.push(Precedence::new(before, after));
        self
    }

    /// Parses and validates an instance from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, QuboError> {
        let instance: Self = serde_json::from_str(json)?;
        instance.validate()?;
        Ok(instance)
    }

    /// Parses and validates an instance from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuboError> {
        let instance: Self = serde_json::from_reader(reader)?;
        instance.validate()?;
        Ok(instance)
    }

    /// Validates the instance, returning every detected problem.
    pub fn validate(&self) -> Result<(), QuboError> {
        validate_instance(self).map_err(QuboError::Validation)
    }

    /// Finds a task by name.
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Task durations keyed by name.
    pub fn durations(&self) -> HashMap<&str, u32> {
        self.tasks
            .iter()
            .map(|t| (t.name.as_str(), t.duration))
            .collect()
    }

    /// One past the last slot (exclusive end of the planning horizon).
    pub fn horizon(&self) -> u64 {
        self.slots.iter().max().map_or(0, |&s| u64::from(s) + 1)
    }

    /// Number of robots.
    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
