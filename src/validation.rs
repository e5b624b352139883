//! Input validation for problem instances.
//!
//! Checks structural integrity of an instance before any variable is
//! registered. Detects:
//! - Empty robot, slot, or task collections
//! - Duplicate robot labels, slots, and task names
//! - Precedence edges naming unknown tasks or a task and itself
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::ProblemInstance;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The instance has no robots.
    EmptyRobots,
    /// The instance has no slots.
    EmptySlots,
    /// The instance has no tasks.
    EmptyTasks,
    /// Two robots, slots, or tasks share the same identity.
    DuplicateId,
    /// A precedence edge references a task that doesn't exist.
    InvalidPredecessor,
    /// A precedence edge links a task to itself.
    SelfPrecedence,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A penalty or objective weight is negative or not finite.
    InvalidWeight,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. Robots, slots, and tasks are non-empty
/// 2. No duplicate robot labels, slots, or task names
/// 3. All precedence edges reference existing tasks
/// 4. No precedence edge links a task to itself
/// 5. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.robots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRobots,
            "robots must not be empty",
        ));
    }
    if instance.slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptySlots,
            "slots must not be empty",
        ));
    }
    if instance.tasks.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTasks,
            "tasks must not be empty",
        ));
    }

    let mut robots = HashSet::new();
    for r in &instance.robots {
        if !robots.insert(r.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate robot: {r}"),
            ));
        }
    }

    let mut slots = HashSet::new();
    for z in &instance.slots {
        if !slots.insert(*z) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate slot: {z}"),
            ));
        }
    }

    let mut task_names = HashSet::new();
    for t in &instance.tasks {
        if !task_names.insert(t.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task name: {}", t.name),
            ));
        }
    }

    for edge in &instance.precedence {
        for name in [&edge.before, &edge.after] {
            if !task_names.contains(name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Precedence '{}' -> '{}' references unknown task '{}'",
                        edge.before, edge.after, name
                    ),
                ));
            }
        }
        if edge.is_self_loop() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfPrecedence,
                format!("Task '{}' cannot precede itself", edge.before),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(instance) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// Self-loops are reported separately and skipped here.
fn detect_cycles(instance: &ProblemInstance) -> Option<ValidationError> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in instance.precedence.iter().filter(|e| !e.is_self_loop()) {
        adj.entry(edge.before.as_str())
            .or_default()
            .push(edge.after.as_str());
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    // Iterate tasks in declaration order so the reported node is deterministic.
    let mut roots: Vec<&str> = instance.tasks.iter().map(|t| t.name.as_str()).collect();
    roots.extend(adj.keys().copied());

    for node in roots {
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
