//! Capacity / no-overlap encodings.
//!
//! The occupancy variable `w[t,r,z]` marks that task `t` keeps robot `r`
//! busy during slot `z`. A start at `s` keeps the task busy during `z`
//! iff `s ≤ z < s + p_t` (the *window* of `z`). Two strategies trade
//! precision for term count:
//!
//! | Strategy | Linking | Duration equality | Capacity |
//! |----------|---------|-------------------|----------|
//! | [`ExactCapacity`] | `w = x ∧ window` | `Σ_z w = p·x` | at most one task per `(r, z)` |
//! | [`RelaxedCapacity`] | `w ≤ x`, `w ≤ Σ window y` | – | at most one task per `(r, z)` |
//!
//! The duration equality adds `O(|Z|²)` pairwise `w` terms per
//! `(task, robot)` and dominates the model size. The relaxed strategy
//! omits it. No term rewards occupancy, so a relaxed sample may leave
//! `w` at 0 and two tasks can then share a `(robot, slot)` at no cost:
//! the relaxed model does not detect collisions on its own.

use std::fmt::Debug;

use log::trace;

use crate::error::QuboError;
use crate::models::{ProblemInstance, Task};
use crate::qubo::{penalty, Qubo};
use crate::variables::VariableTables;

/// A capacity / no-overlap encoding strategy.
pub trait CapacityEncoding: Debug + Send + Sync {
    /// Strategy name (e.g., "exact", "relaxed").
    fn name(&self) -> &'static str;

    /// Adds the linking penalties (weight `link`) and the per-(robot, slot)
    /// capacity penalty (weight `capacity`).
    fn encode(
        &self,
        qubo: &mut Qubo,
        instance: &ProblemInstance,
        vars: &VariableTables,
        link: f64,
        capacity: f64,
    ) -> Result<(), QuboError>;
}

/// Full encoding: occupancy is pinned to the assignment it implies.
///
/// Unit-duration tasks have a single-slot window, so `w[t,r,z]` is linked
/// directly as `x[t,r] ∧ y[t,z]`. Longer tasks bound `w` from above by `x`
/// and by the window starts; the duration equality then forces exactly
/// `p` occupied slots on the assigned robot. The window bound carries an
/// at-most-one term over its starts, so it never turns negative when
/// several starts are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCapacity;

/// Simplified encoding: occupancy is only bounded from above.
///
/// Nothing forces `w` up to the assignment, so a same-robot collision
/// with its occupancy left unset costs nothing here. The window bound is
/// the plain `w (1 − Σ y)` and drops below zero when several starts of
/// one window are set; the exactly-one-slot weight has to dominate it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedCapacity;

impl CapacityEncoding for ExactCapacity {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn encode(
        &self,
        qubo: &mut Qubo,
        instance: &ProblemInstance,
        vars: &VariableTables,
        link: f64,
        capacity: f64,
    ) -> Result<(), QuboError> {
        if !has_domain(instance) {
            return Ok(());
        }

        if link != 0.0 {
            for task in &instance.tasks {
                for robot in &instance.robots {
                    let x = vars.x(&task.name, robot)?;
                    let mut ws = Vec::with_capacity(instance.slots.len());
                    for &z in &instance.slots {
                        let w = vars.w(&task.name, robot, z)?;
                        if task.duration == 1 {
                            penalty::and_link(qubo, x, vars.y(&task.name, z)?, w, link);
                        } else {
                            penalty::upper_bound(qubo, w, &[x], link);
                            let window = window_starts(instance, vars, task, z)?;
                            penalty::exclusive_upper_bound(qubo, w, &window, link);
                        }
                        ws.push(w);
                    }
                    penalty::sum_equals_scaled(qubo, &ws, x, f64::from(task.duration), link);
                }
            }
            trace!(
                "exact capacity: linked {} occupancy families",
                instance.tasks.len() * instance.robots.len()
            );
        }

        encode_capacity(qubo, instance, vars, capacity)
    }
}

impl CapacityEncoding for RelaxedCapacity {
    fn name(&self) -> &'static str {
        "relaxed"
    }

    fn encode(
        &self,
        qubo: &mut Qubo,
        instance: &ProblemInstance,
        vars: &VariableTables,
        link: f64,
        capacity: f64,
    ) -> Result<(), QuboError> {
        if !has_domain(instance) {
            return Ok(());
        }

        if link != 0.0 {
            for task in &instance.tasks {
                for robot in &instance.robots {
                    let x = vars.x(&task.name, robot)?;
                    for &z in &instance.slots {
                        let w = vars.w(&task.name, robot, z)?;
                        penalty::upper_bound(qubo, w, &[x], link);
                        let window = window_starts(instance, vars, task, z)?;
                        penalty::upper_bound(qubo, w, &window, link);
                    }
                }
            }
            trace!(
                "relaxed capacity: bounded {} occupancy families",
                instance.tasks.len() * instance.robots.len()
            );
        }

        encode_capacity(qubo, instance, vars, capacity)
    }
}

/// At most one task per (robot, slot): `2λ` on every pair of `w[·,r,z]`.
///
/// Inequality-only; idle capacity is never penalized.
pub fn encode_capacity(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    lambda: f64,
) -> Result<(), QuboError> {
    if lambda == 0.0 || !has_domain(instance) {
        return Ok(());
    }

    for robot in &instance.robots {
        for &z in &instance.slots {
            let ws = instance
                .tasks
                .iter()
                .map(|t| vars.w(&t.name, robot, z))
                .collect::<Result<Vec<_>, _>>()?;
            penalty::at_most_one(qubo, &ws, lambda);
        }
    }
    Ok(())
}

fn has_domain(instance: &ProblemInstance) -> bool {
    !instance.tasks.is_empty() && !instance.robots.is_empty() && !instance.slots.is_empty()
}

/// `y` handles of the starts that keep `task` busy during `slot`.
fn window_starts(
    instance: &ProblemInstance,
    vars: &VariableTables,
    task: &Task,
    slot: u32,
) -> Result<Vec<usize>, QuboError> {
    task.window(&instance.slots, slot)
        .map(|s| vars.y(&task.name, s))
        .collect()
}
