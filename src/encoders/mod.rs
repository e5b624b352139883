//! Constraint and objective encoders.
//!
//! Each encoder expands one term of the overall energy into
//! [`Qubo`](crate::qubo::Qubo) updates. Encoders only ever add, so
//! they can be applied in any order.
//!
//! | Term | Encoder | Weight field |
//! |------|---------|--------------|
//! | `Σ_t (Σ_z y[t,z] − 1)²` | [`encode_exactly_one_slot`] | `exactly_one_slot` |
//! | `Σ_t (Σ_r x[t,r] − 1)²` | [`encode_exactly_one_robot`] | `exactly_one_robot` |
//! | `w` linking + capacity | [`CapacityEncoding`] | `link`, `capacity` |
//! | `Σ_t (Σ_r x[t,r] − Σ_z y[t,z])²` | [`encode_consistency`] | `consistency` |
//! | overlapping starts of `(a, b)` | [`encode_precedence`] | `precedence` |
//! | completion times | [`encode_completion_time`] | `completion_time` |
//! | workload spread | [`encode_workload_balance`] | `balance` |
//!
//! Every encoder is a no-op when its weight is zero or a domain set it
//! iterates over is empty.
//!
//! # Reference
//! Lucas (2014), "Ising formulations of many NP problems", Sec. 6 (Job Sequencing)

mod capacity;
mod constraints;
mod objectives;
#[cfg(test)]
pub(crate) mod testing;

pub use capacity::{encode_capacity, CapacityEncoding, ExactCapacity, RelaxedCapacity};
pub use constraints::{
    encode_consistency, encode_exactly_one_robot, encode_exactly_one_slot, encode_precedence,
};
pub use objectives::{encode_completion_time, encode_workload_balance};

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

/// Non-negative weights for every penalty and objective term.
///
/// `Default` disables every term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Exactly one start slot per task.
    pub exactly_one_slot: f64,
    /// Exactly one robot per task.
    pub exactly_one_robot: f64,
    /// Linking of occupancy variables to assignment and start variables.
    pub link: f64,
    /// At most one task per (robot, slot).
    pub capacity: f64,
    /// Robot count equals slot count per task.
    pub consistency: f64,
    /// Successors never start before predecessors complete.
    pub precedence: f64,
    /// Completion-time objective.
    pub completion_time: f64,
    /// Workload-balance objective.
    pub balance: f64,
}

impl PenaltyWeights {
    /// Every constraint weighted `lambda`, objectives disabled.
    pub fn uniform(lambda: f64) -> Self {
        Self {
            exactly_one_slot: lambda,
            exactly_one_robot: lambda,
            link: lambda,
            capacity: lambda,
            consistency: lambda,
            precedence: lambda,
            completion_time: 0.0,
            balance: 0.0,
        }
    }

    /// Sets the exactly-one-slot weight.
    pub fn with_exactly_one_slot(mut self, w: f64) -> Self {
        self.exactly_one_slot = w;
        self
    }

    /// Sets the exactly-one-robot weight.
    pub fn with_exactly_one_robot(mut self, w: f64) -> Self {
        self.exactly_one_robot = w;
        self
    }

    /// Sets the occupancy link weight.
    pub fn with_link(mut self, w: f64) -> Self {
        self.link = w;
        self
    }

    /// Sets the capacity weight.
    pub fn with_capacity(mut self, w: f64) -> Self {
        self.capacity = w;
        self
    }

    /// Sets the robot/slot consistency weight.
    pub fn with_consistency(mut self, w: f64) -> Self {
        self.consistency = w;
        self
    }

    /// Sets the precedence weight.
    pub fn with_precedence(mut self, w: f64) -> Self {
        self.precedence = w;
        self
    }

    /// Sets the completion-time objective weight.
    pub fn with_completion_time(mut self, w: f64) -> Self {
        self.completion_time = w;
        self
    }

    /// Sets the workload-balance objective weight.
    pub fn with_balance(mut self, w: f64) -> Self {
        self.balance = w;
        self
    }

    /// Parses weights from JSON. Missing fields default to zero.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("exactly_one_slot", self.exactly_one_slot),
            ("exactly_one_robot", self.exactly_one_robot),
            ("link", self.link),
            ("capacity", self.capacity),
            ("consistency", self.consistency),
            ("precedence", self.precedence),
            ("completion_time", self.completion_time),
            ("balance", self.balance),
        ]
    }

    /// Checks that every weight is finite and non-negative.
    pub fn validate(&self) -> ValidationResult {
        let errors: Vec<ValidationError> = self
            .named()
            .into_iter()
            .filter(|(_, w)| !w.is_finite() || *w < 0.0)
            .map(|(name, w)| {
                ValidationError::new(
                    ValidationErrorKind::InvalidWeight,
                    format!("Weight '{name}' must be finite and non-negative, got {w}"),
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
