//! Assignment, consistency, and precedence penalties.
//!
//! # Reference
//! Lucas (2014), "Ising formulations of many NP problems", Sec. 6

use log::trace;

use crate::error::QuboError;
use crate::models::ProblemInstance;
use crate::qubo::{penalty, Qubo};
use crate::variables::VariableTables;

/// Exactly one start slot per task: `λ Σ_t (Σ_z y[t,z] − 1)²`.
pub fn encode_exactly_one_slot(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    lambda: f64,
) -> Result<(), QuboError> {
    if lambda == 0.0 || instance.tasks.is_empty() || instance.slots.is_empty() {
        return Ok(());
    }

    for task in &instance.tasks {
        let ys = instance
            .slots
            .iter()
            .map(|&z| vars.y(&task.name, z))
            .collect::<Result<Vec<_>, _>>()?;
        penalty::one_hot(qubo, &ys, lambda);
    }

    trace!("exactly-one-slot: {} families", instance.tasks.len());
    Ok(())
}

/// Exactly one robot per task: `λ Σ_t (Σ_r x[t,r] − 1)²`.
pub fn encode_exactly_one_robot(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    lambda: f64,
) -> Result<(), QuboError> {
    if lambda == 0.0 || instance.tasks.is_empty() || instance.robots.is_empty() {
        return Ok(());
    }

    for task in &instance.tasks {
        let xs = instance
            .robots
            .iter()
            .map(|r| vars.x(&task.name, r))
            .collect::<Result<Vec<_>, _>>()?;
        penalty::one_hot(qubo, &xs, lambda);
    }

    trace!("exactly-one-robot: {} families", instance.tasks.len());
    Ok(())
}

/// Robot/slot count consistency: `λ Σ_t (Σ_r x[t,r] − Σ_z y[t,z])²`.
///
/// Together with exactly-one-slot this forces exactly one robot.
pub fn encode_consistency(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    lambda: f64,
) -> Result<(), QuboError> {
    if lambda == 0.0
        || instance.tasks.is_empty()
        || instance.robots.is_empty()
        || instance.slots.is_empty()
    {
        return Ok(());
    }

    for task in &instance.tasks {
        let xs = instance
            .robots
            .iter()
            .map(|r| vars.x(&task.name, r))
            .collect::<Result<Vec<_>, _>>()?;
        let ys = instance
            .slots
            .iter()
            .map(|&z| vars.y(&task.name, z))
            .collect::<Result<Vec<_>, _>>()?;
        penalty::sum_equals_sum(qubo, &xs, &ys, lambda);
    }

    trace!("consistency: {} tasks", instance.tasks.len());
    Ok(())
}

/// Precedence: `λ Σ_{(a,b)} Σ_{z_b < z_a + p_a} y[a,z_a] · y[b,z_b]`.
///
/// Every start pair where `b` starts before `a` completes costs `λ`.
/// Quadratic only; no linear contribution. An edge naming an unknown
/// task fails instead of being skipped.
pub fn encode_precedence(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    lambda: f64,
) -> Result<(), QuboError> {
    if lambda == 0.0
        || instance.tasks.is_empty()
        || instance.slots.is_empty()
        || instance.precedence.is_empty()
    {
        return Ok(());
    }

    let mut terms = 0usize;
    for edge in &instance.precedence {
        let before = instance
            .task(&edge.before)
            .ok_or_else(|| QuboError::UnknownTask(edge.before.clone()))?;
        if instance.task(&edge.after).is_none() {
            return Err(QuboError::UnknownTask(edge.after.clone()));
        }

        for &z_a in &instance.slots {
            let ya = vars.y(&before.name, z_a)?;
            let completion = before.completion(z_a);
            for &z_b in &instance.slots {
                if u64::from(z_b) < completion {
                    let yb = vars.y(&edge.after, z_b)?;
                    qubo.add_quadratic(ya, yb, lambda);
                    terms += 1;
                }
            }
        }
    }

    trace!(
        "precedence: {} edges, {terms} terms",
        instance.precedence.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::testing::{sample_with, setup};
    use crate::models::Task;
    use crate::registry::VarKey;

    fn two_robot_instance() -> ProblemInstance {
        ProblemInstance::new()
            .with_robot("R1")
            .with_robot("R2")
            .with_slots([0, 1, 2])
            .with_task(Task::new("A", 2))
            .with_task(Task::new("B", 1))
    }

    #[test]
    fn test_exactly_one_slot_penalty() {
        let inst = two_robot_instance();
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_exactly_one_slot(&mut q, &inst, &vars, 5.0).unwrap();

        // A at one slot, B at one slot → 0
        let ok = sample_with(&reg, &[vars.y("A", 0).unwrap(), vars.y("B", 2).unwrap()]);
        assert!(q.energy(&ok).abs() < 1e-9);

        // A at two slots (k=2 → λ), B at none (k=0 → λ)
        let bad = sample_with(&reg, &[vars.y("A", 0).unwrap(), vars.y("A", 1).unwrap()]);
        assert!((q.energy(&bad) - 10.0).abs() < 1e-9);

        // x and w untouched
        assert_eq!(q.coefficient(vars.x("A", "R1").unwrap(), vars.x("A", "R1").unwrap()), 0.0);
    }

    #[test]
    fn test_exactly_one_robot_penalty() {
        let inst = two_robot_instance();
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_exactly_one_robot(&mut q, &inst, &vars, 3.0).unwrap();

        let ok = sample_with(&reg, &[vars.x("A", "R2").unwrap(), vars.x("B", "R1").unwrap()]);
        assert!(q.energy(&ok).abs() < 1e-9);

        let both = sample_with(
            &reg,
            &[
                vars.x("A", "R1").unwrap(),
                vars.x("A", "R2").unwrap(),
                vars.x("B", "R1").unwrap(),
            ],
        );
        assert!((q.energy(&both) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_is_noop() {
        let inst = two_robot_instance();
        let (_, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_exactly_one_slot(&mut q, &inst, &vars, 0.0).unwrap();
        encode_exactly_one_robot(&mut q, &inst, &vars, 0.0).unwrap();
        encode_consistency(&mut q, &inst, &vars, 0.0).unwrap();
        encode_precedence(&mut q, &inst, &vars, 0.0).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.offset(), 0.0);
    }

    #[test]
    fn test_consistency_zero_iff_counts_match() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_robot("R2")
            .with_slots([0, 1])
            .with_task(Task::new("A", 1));
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_consistency(&mut q, &inst, &vars, 2.0).unwrap();

        let xs = [vars.x("A", "R1").unwrap(), vars.x("A", "R2").unwrap()];
        let ys = [vars.y("A", 0).unwrap(), vars.y("A", 1).unwrap()];

        for mask in 0..16u32 {
            let mut ones = Vec::new();
            for (bit, &idx) in xs.iter().chain(&ys).enumerate() {
                if mask & (1 << bit) != 0 {
                    ones.push(idx);
                }
            }
            let kx = (mask & 0b0011).count_ones() as f64;
            let ky = (mask & 0b1100).count_ones() as f64;
            let e = q.energy(&sample_with(&reg, &ones));
            assert!((e - 2.0 * (kx - ky) * (kx - ky)).abs() < 1e-9);
            assert_eq!(e.abs() < 1e-9, kx == ky);
        }
    }

    #[test]
    fn test_precedence_overlapping_starts() {
        // A (p=2) before B, slots 0..4
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_slots(0..4)
            .with_task(Task::new("A", 2))
            .with_task(Task::new("B", 1))
            .with_precedence("A", "B");
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_precedence(&mut q, &inst, &vars, 7.0).unwrap();

        for z_a in 0..4u32 {
            for z_b in 0..4u32 {
                let s = sample_with(&reg, &[vars.y("A", z_a).unwrap(), vars.y("B", z_b).unwrap()]);
                let expected = if z_b < z_a + 2 { 7.0 } else { 0.0 };
                assert!((q.energy(&s) - expected).abs() < 1e-9, "z_a={z_a} z_b={z_b}");
            }
        }
        assert_eq!(q.stats(reg.len()).num_linear, 0);
    }

    #[test]
    fn test_precedence_unknown_task_fails() {
        let mut inst = two_robot_instance();
        let (_, vars) = setup(&inst);
        inst = inst.with_precedence("A", "Ghost");

        let mut q = Qubo::new();
        match encode_precedence(&mut q, &inst, &vars, 1.0) {
            Err(QuboError::UnknownTask(name)) => assert_eq!(name, "Ghost"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_variable_fails_fast() {
        let inst = two_robot_instance();
        let (_, vars) = setup(&inst);
        let extended = inst.clone().with_task(Task::new("C", 1));

        let mut q = Qubo::new();
        match encode_exactly_one_slot(&mut q, &extended, &vars, 1.0) {
            Err(QuboError::UnknownVariable(VarKey::Start(k))) => assert_eq!(k.task, "C"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
