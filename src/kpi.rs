//! Schedule quality metrics (KPIs).
//!
//! Computes the indicators the objective encoders target, so a decoded
//! schedule can be compared against the energy the solver reported.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Completion | Sum of task completion times |
//! | Load by Robot | Busy slots per robot |
//! | Load Imbalance | `Σ_r L_r² − (Σ_r L_r)² / R` |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ProblemInstance, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: u64,
    /// Sum of completion times over assigned tasks.
    pub total_completion: u64,
    /// Busy slots per robot (every robot of the instance, idle ones at 0).
    pub load_by_robot: HashMap<String, u64>,
    /// Load spread minimized by the workload-balance objective.
    pub load_imbalance: f64,
    /// Fraction of instance tasks that received an assignment (0.0..1.0).
    pub assigned_rate: f64,
    /// Number of violations in the schedule.
    pub violation_count: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    pub fn calculate(schedule: &Schedule, instance: &ProblemInstance) -> Self {
        let mut load_by_robot: HashMap<String, u64> =
            instance.robots.iter().map(|r| (r.clone(), 0)).collect();
        for (robot, load) in schedule.loads() {
            *load_by_robot.entry(robot).or_insert(0) += load;
        }

        let load_imbalance = if load_by_robot.is_empty() {
            0.0
        } else {
            let r = load_by_robot.len() as f64;
            let sum_sq: f64 = load_by_robot.values().map(|&l| (l * l) as f64).sum();
            let total: f64 = load_by_robot.values().map(|&l| l as f64).sum();
            sum_sq - total * total / r
        };

        let assigned_rate = if instance.tasks.is_empty() {
            1.0
        } else {
            schedule.assignments.len() as f64 / instance.tasks.len() as f64
        };

        Self {
            makespan: schedule.makespan(),
            total_completion: schedule.assignments.iter().map(|a| a.end).sum(),
            load_by_robot,
            load_imbalance,
            assigned_rate,
            violation_count: schedule.violations.len(),
        }
    }

    /// Whether the schedule is feasible and finishes by `max_makespan`.
    pub fn meets_thresholds(&self, max_makespan: u64) -> bool {
        self.violation_count == 0 && self.makespan <= max_makespan
    }
}
