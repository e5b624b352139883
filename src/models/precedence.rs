//! Precedence relations between tasks.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", precedence constraints (Ch. 2.1)

use serde::{Deserialize, Serialize};

/// Task `after` may not start before task `before` completes.
///
/// Serialized as a two-element array `[before, after]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Precedence {
    /// Predecessor task name.
    pub before: String,
    /// Successor task name.
    pub after: String,
}

impl Precedence {
    /// Creates a precedence edge `before -> after`.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Whether the edge is a self-loop.
    pub fn is_self_loop(&self) -> bool {
        self.before == self.after
    }
}

impl From<(String, String)> for Precedence {
    fn from((before, after): (String, String)) -> Self {
        Self { before, after }
    }
}

impl From<Precedence> for (String, String) {
    fn from(p: Precedence) -> Self {
        (p.before, p.after)
    }
}
