//! Scheduling-quality objectives.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use log::trace;

use crate::error::QuboError;
use crate::models::ProblemInstance;
use crate::qubo::Qubo;
use crate::variables::VariableTables;

/// Completion-time objective.
///
/// Without a reference, adds `weight · (z + p_t)²` to every `y[t,z]`
/// (a linear term, since `y² = y`).
///
/// With a per-task completion-time `reference`, encodes
/// `weight · (Σ_z (z + p_t) y[t,z] − C_t)²` for every task: the linear
/// terms above, `2·weight·(z1 + p)(z2 + p)` on same-task slot pairs, and
/// `−2·weight·C_t·(z + p)` on each `y[t,z]` for tasks present in the
/// reference (plus `weight · C_t²` in the offset). Tasks absent from the
/// reference are pulled towards 0.
pub fn encode_completion_time(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    weight: f64,
    reference: Option<&HashMap<String, f64>>,
) -> Result<(), QuboError> {
    if weight == 0.0 || instance.tasks.is_empty() || instance.slots.is_empty() {
        return Ok(());
    }

    for task in &instance.tasks {
        let terms = instance
            .slots
            .iter()
            .map(|&z| Ok((vars.y(&task.name, z)?, task.completion(z) as f64)))
            .collect::<Result<Vec<_>, QuboError>>()?;

        for &(y, c) in &terms {
            qubo.add_linear(y, weight * c * c);
        }

        let Some(reference) = reference else {
            continue;
        };

        for (i, &(y1, c1)) in terms.iter().enumerate() {
            for &(y2, c2) in &terms[i + 1..] {
                qubo.add_quadratic(y1, y2, 2.0 * weight * c1 * c2);
            }
        }
        if let Some(&target) = reference.get(&task.name) {
            for &(y, c) in &terms {
                qubo.add_linear(y, -2.0 * weight * target * c);
            }
            qubo.add_offset(weight * target * target);
        }
    }

    trace!(
        "completion time: {} tasks, reference {}",
        instance.tasks.len(),
        reference.is_some()
    );
    Ok(())
}

/// Workload balance: `weight · (Σ_r L_r² − (1/R)(Σ_r L_r)²)` with
/// `L_r = Σ_t p_t · x[t,r]`.
///
/// Expands to
/// - linear `weight·(1 − 1/R)·p_t²` per `x[t,r]`
/// - same robot `2·weight·(1 − 1/R)·p_1·p_2` per task pair
/// - distinct robots `−2·weight·(1/R)·p_1·p_2` for every task pair,
///   `t1 = t2` included (that pair is `x[t,r1]·x[t,r2]`, not a constant)
pub fn encode_workload_balance(
    qubo: &mut Qubo,
    instance: &ProblemInstance,
    vars: &VariableTables,
    weight: f64,
) -> Result<(), QuboError> {
    if weight == 0.0 || instance.tasks.is_empty() || instance.robots.is_empty() {
        return Ok(());
    }

    let inv_r = 1.0 / instance.robots.len() as f64;
    let same = weight * (1.0 - inv_r);
    let cross = -2.0 * weight * inv_r;

    // x handles per robot, aligned with instance.tasks
    let columns = instance
        .robots
        .iter()
        .map(|r| {
            instance
                .tasks
                .iter()
                .map(|t| Ok((vars.x(&t.name, r)?, f64::from(t.duration))))
                .collect::<Result<Vec<_>, QuboError>>()
        })
        .collect::<Result<Vec<_>, QuboError>>()?;

    for column in &columns {
        for (i, &(x1, p1)) in column.iter().enumerate() {
            qubo.add_linear(x1, same * p1 * p1);
            for &(x2, p2) in &column[i + 1..] {
                qubo.add_quadratic(x1, x2, 2.0 * same * p1 * p2);
            }
        }
    }

    for (a, col_a) in columns.iter().enumerate() {
        for col_b in &columns[a + 1..] {
            for &(x1, p1) in col_a {
                for &(x2, p2) in col_b {
                    qubo.add_quadratic(x1, x2, cross * p1 * p2);
                }
            }
        }
    }

    trace!(
        "workload balance: {} robots x {} tasks",
        instance.robots.len(),
        instance.tasks.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::testing::{sample_with, setup};
    use crate::models::Task;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_completion_time_linear() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_slots([0, 1, 2])
            .with_task(Task::new("A", 2));
        let (_, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_completion_time(&mut q, &inst, &vars, 0.5, None).unwrap();

        // (z + 2)^2 * 0.5 for z = 0, 1, 2
        let y0 = vars.y("A", 0).unwrap();
        assert!((q.coefficient(y0, y0) - 2.0).abs() < EPS);
        let y1 = vars.y("A", 1).unwrap();
        assert!((q.coefficient(y1, y1) - 4.5).abs() < EPS);
        let y2 = vars.y("A", 2).unwrap();
        assert!((q.coefficient(y2, y2) - 8.0).abs() < EPS);
        assert_eq!(q.stats(vars.len()).num_quadratic, 0);
    }

    #[test]
    fn test_completion_time_prefers_early_start() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_slots(0..5)
            .with_task(Task::new("A", 1));
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_completion_time(&mut q, &inst, &vars, 1.0, None).unwrap();

        let energies: Vec<f64> = (0..5)
            .map(|z| q.energy(&sample_with(&reg, &[vars.y("A", z).unwrap()])))
            .collect();
        assert!(energies.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_completion_time_with_reference() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_slots([0, 1, 2])
            .with_task(Task::new("A", 1))
            .with_task(Task::new("B", 2));
        let (reg, vars) = setup(&inst);
        let reference: HashMap<String, f64> = [("A".to_string(), 2.0)].into_iter().collect();
        let mut q = Qubo::new();
        encode_completion_time(&mut q, &inst, &vars, 1.5, Some(&reference)).unwrap();

        let ys: Vec<(usize, &str, f64)> = inst
            .tasks
            .iter()
            .flat_map(|t| {
                let vars = &vars;
                inst.slots.iter().map(move |&z| {
                    (
                        vars.y(&t.name, z).unwrap(),
                        t.name.as_str(),
                        t.completion(z) as f64,
                    )
                })
            })
            .collect();

        for mask in 0..(1u32 << ys.len()) {
            let mut ones = Vec::new();
            let mut completion: HashMap<&str, f64> = HashMap::new();
            for (i, &(y, name, c)) in ys.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    ones.push(y);
                    *completion.entry(name).or_insert(0.0) += c;
                }
            }
            let mut expected = 0.0;
            for (name, target) in [("A", 2.0), ("B", 0.0)] {
                let c = completion.get(name).copied().unwrap_or(0.0);
                expected += 1.5 * (c - target) * (c - target);
            }
            let e = q.energy(&sample_with(&reg, &ones));
            assert!((e - expected).abs() < 1e-7, "mask {mask}");
        }
    }

    #[test]
    fn test_balance_matches_definition() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_robot("R2")
            .with_robot("R3")
            .with_slots([0])
            .with_task(Task::new("A", 1))
            .with_task(Task::new("B", 2))
            .with_task(Task::new("C", 3));
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_workload_balance(&mut q, &inst, &vars, 0.7).unwrap();

        let xs: Vec<(usize, usize, f64)> = inst
            .robots
            .iter()
            .enumerate()
            .flat_map(|(ri, r)| {
                let vars = &vars;
                inst.tasks
                    .iter()
                    .map(move |t| (vars.x(&t.name, r).unwrap(), ri, f64::from(t.duration)))
            })
            .collect();

        for mask in 0..(1u32 << xs.len()) {
            let mut loads = [0.0f64; 3];
            let mut ones = Vec::new();
            for (i, &(x, ri, p)) in xs.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    loads[ri] += p;
                    ones.push(x);
                }
            }
            let total: f64 = loads.iter().sum();
            let expected =
                0.7 * (loads.iter().map(|l| l * l).sum::<f64>() - total * total / 3.0);
            let e = q.energy(&sample_with(&reg, &ones));
            assert!((e - expected).abs() < 1e-7, "mask {mask}");
        }
    }

    #[test]
    fn test_balance_includes_same_task_cross_robot_pairs() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_robot("R2")
            .with_slots([0])
            .with_task(Task::new("A", 2));
        let (_, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_workload_balance(&mut q, &inst, &vars, 1.0).unwrap();

        let (x1, x2) = (vars.x("A", "R1").unwrap(), vars.x("A", "R2").unwrap());
        // −2 · (1/2) · 2 · 2
        assert!((q.coefficient(x1, x2) + 4.0).abs() < EPS);
        // (1 − 1/2) · 4
        assert!((q.coefficient(x1, x1) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_balanced_assignment_is_cheaper() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_robot("R2")
            .with_slots([0])
            .with_task(Task::new("A", 2))
            .with_task(Task::new("B", 2));
        let (reg, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_workload_balance(&mut q, &inst, &vars, 1.0).unwrap();

        let spread = sample_with(&reg, &[vars.x("A", "R1").unwrap(), vars.x("B", "R2").unwrap()]);
        let stacked = sample_with(&reg, &[vars.x("A", "R1").unwrap(), vars.x("B", "R1").unwrap()]);
        assert!(q.energy(&spread).abs() < EPS);
        assert!((q.energy(&stacked) - 8.0).abs() < EPS);
    }

    #[test]
    fn test_objectives_zero_weight_noop() {
        let inst = ProblemInstance::new()
            .with_robot("R1")
            .with_slots([0])
            .with_task(Task::new("A", 1));
        let (_, vars) = setup(&inst);
        let mut q = Qubo::new();
        encode_completion_time(&mut q, &inst, &vars, 0.0, None).unwrap();
        encode_workload_balance(&mut q, &inst, &vars, 0.0).unwrap();
        assert!(q.is_empty());
    }
}
