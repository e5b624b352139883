//! Schedule (decoded solution) model.
//!
//! A schedule assigns each task to one robot and one start slot. It is
//! rebuilt from a decoded sample and records every constraint the
//! sample breaks, so infeasible solver output is reported rather than
//! silently repaired.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{ProblemInstance, Slot};
use crate::decode::DecodedSample;

/// A complete schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Task-robot-time assignments, in task order.
    pub assignments: Vec<Assignment>,
    /// Constraint violations detected in this schedule.
    pub violations: Vec<Violation>,
}

/// A task-robot-time assignment over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Task name.
    pub task: String,
    /// Robot label.
    pub robot: String,
    /// Start slot.
    pub start: Slot,
    /// Completion time (`start + duration`).
    pub end: u64,
}

/// A constraint violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (task or robot).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Task assigned to zero or several robots.
    RobotCount,
    /// Task started at zero or several slots.
    StartCount,
    /// Two tasks overlap on the same robot.
    CapacityExceeded,
    /// Successor started before its predecessor completed.
    PrecedenceViolation,
    /// Task completes after the last slot.
    HorizonExceeded,
    /// Occupancy variables disagree with the assignment they imply.
    OccupancyMismatch,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(task: impl Into<String>, robot: impl Into<String>, start: Slot, end: u64) -> Self {
        Self {
            task: task.into(),
            robot: robot.into(),
            start,
            end,
        }
    }

    /// Duration in slots.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - u64::from(self.start)
    }

    /// Whether two assignments share at least one slot.
    pub fn overlaps(&self, other: &Assignment) -> bool {
        u64::from(self.start) < other.end && u64::from(other.start) < self.end
    }
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a schedule from a decoded sample.
    ///
    /// A task gets an assignment only when exactly one robot and exactly
    /// one start were selected for it. Every inconsistency becomes a
    /// [`Violation`].
    pub fn from_decoded(instance: &ProblemInstance, decoded: &DecodedSample) -> Self {
        let mut schedule = Schedule::new();
        let horizon = instance.horizon();

        for task in &instance.tasks {
            let robots = decoded.robots_of(&task.name);
            let starts = decoded.starts_of(&task.name);

            if robots.len() != 1 {
                schedule.violations.push(Violation::new(
                    ViolationType::RobotCount,
                    task.name.as_str(),
                    format!("Task '{}' assigned to {} robots", task.name, robots.len()),
                    90,
                ));
            }
            if starts.len() != 1 {
                schedule.violations.push(Violation::new(
                    ViolationType::StartCount,
                    task.name.as_str(),
                    format!("Task '{}' started at {} slots", task.name, starts.len()),
                    90,
                ));
            }

            let assignment = match (robots.as_slice(), starts.as_slice()) {
                ([robot], [start]) => Some(Assignment::new(
                    task.name.as_str(),
                    *robot,
                    *start,
                    task.completion(*start),
                )),
                _ => None,
            };

            let implied: BTreeSet<(&str, Slot)> = match &assignment {
                Some(a) => instance
                    .slots
                    .iter()
                    .filter(|&&z| task.occupies(a.start, z))
                    .map(|&z| (a.robot.as_str(), z))
                    .collect(),
                None => BTreeSet::new(),
            };
            let occupied: BTreeSet<(&str, Slot)> = decoded
                .occupancies
                .iter()
                .filter(|k| k.task == task.name)
                .map(|k| (k.robot.as_str(), k.slot))
                .collect();
            if implied != occupied {
                schedule.violations.push(Violation::new(
                    ViolationType::OccupancyMismatch,
                    task.name.as_str(),
                    format!(
                        "Task '{}' occupies {} (robot, slot) cells, assignment implies {}",
                        task.name,
                        occupied.len(),
                        implied.len()
                    ),
                    50,
                ));
            }

            if let Some(a) = assignment {
                if a.end > horizon {
                    schedule.violations.push(Violation::new(
                        ViolationType::HorizonExceeded,
                        task.name.as_str(),
                        format!(
                            "Task '{}' completes at {} after horizon {}",
                            task.name, a.end, horizon
                        ),
                        80,
                    ));
                }
                schedule.assignments.push(a);
            }
        }

        schedule.check_overlaps();
        schedule.check_precedence(instance);
        schedule
    }

    fn check_overlaps(&mut self) {
        let mut found = Vec::new();
        for (i, a) in self.assignments.iter().enumerate() {
            for b in &self.assignments[i + 1..] {
                if a.robot == b.robot && a.overlaps(b) {
                    found.push(Violation::new(
                        ViolationType::CapacityExceeded,
                        a.robot.as_str(),
                        format!("Tasks '{}' and '{}' overlap on '{}'", a.task, b.task, a.robot),
                        95,
                    ));
                }
            }
        }
        self.violations.extend(found);
    }

    fn check_precedence(&mut self, instance: &ProblemInstance) {
        for edge in &instance.precedence {
            let (Some(before), Some(after)) = (
                self.assignment_for_task(&edge.before),
                self.assignment_for_task(&edge.after),
            ) else {
                continue;
            };
            if u64::from(after.start) < before.end {
                let v = Violation::new(
                    ViolationType::PrecedenceViolation,
                    edge.after.as_str(),
                    format!(
                        "Task '{}' starts at {} before '{}' completes at {}",
                        edge.after, after.start, edge.before, before.end
                    ),
                    95,
                );
                self.violations.push(v);
            }
        }
    }

    /// Whether the schedule has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Latest completion time across all assignments.
    pub fn makespan(&self) -> u64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Finds the assignment of a task.
    pub fn assignment_for_task(&self, task: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task == task)
    }

    /// Returns all assignments on a robot.
    pub fn assignments_for_robot(&self, robot: &str) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.robot == robot).collect()
    }

    /// Busy slots per robot that has assignments.
    pub fn loads(&self) -> HashMap<String, u64> {
        let mut loads: HashMap<String, u64> = HashMap::new();
        for a in &self.assignments {
            *loads.entry(a.robot.clone()).or_insert(0) += a.duration();
        }
        loads
    }

    /// Violations of a given type.
    pub fn violations_of(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}
