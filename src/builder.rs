//! QUBO model construction.
//!
//! [`QuboBuilder`] runs one model-construction pass: validate, register
//! variables, apply every encoder against a single owned accumulator,
//! optionally prune after each stage, and hand back a read-only
//! [`QuboModel`].
//!
//! # Reference
//! Glover, Kochenberger & Du (2019), "Quantum Bridge Analytics I"

use std::collections::HashMap;

use log::{debug, info};

use crate::decode::{decode_bits, decode_sample, DecodedSample};
use crate::encoders::{
    encode_completion_time, encode_consistency, encode_exactly_one_robot,
    encode_exactly_one_slot, encode_precedence, encode_workload_balance, CapacityEncoding,
    ExactCapacity, PenaltyWeights,
};
use crate::error::QuboError;
use crate::models::{ProblemInstance, Schedule};
use crate::qubo::{DenseMatrix, Qubo, QuboStats};
use crate::registry::{VarKey, VariableRegistry};
use crate::validation::validate_instance;
use crate::variables::{assign_variables, ReverseTables, VariableTables};

/// Builds a QUBO model from a problem instance.
///
/// # Example
/// ```
/// use u_qubo::builder::QuboBuilder;
/// use u_qubo::encoders::{PenaltyWeights, RelaxedCapacity};
/// use u_qubo::models::{ProblemInstance, Task};
///
/// let instance = ProblemInstance::new()
///     .with_robot("R1")
///     .with_slots(0..2)
///     .with_task(Task::new("A", 1))
///     .with_task(Task::new("B", 1));
///
/// let model = QuboBuilder::new(&instance)
///     .with_weights(PenaltyWeights::uniform(5.0))
///     .with_capacity_encoding(RelaxedCapacity)
///     .with_prune_epsilon(1e-12)
///     .build()
///     .unwrap();
///
/// assert_eq!(model.num_variables(), 10);
/// ```
#[derive(Debug)]
pub struct QuboBuilder<'a> {
    instance: &'a ProblemInstance,
    weights: PenaltyWeights,
    capacity: Box<dyn CapacityEncoding>,
    prune_epsilon: Option<f64>,
    completion_reference: Option<HashMap<String, f64>>,
}

impl<'a> QuboBuilder<'a> {
    /// Creates a builder with every term disabled and the exact capacity strategy.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            weights: PenaltyWeights::default(),
            capacity: Box::new(ExactCapacity),
            prune_epsilon: None,
            completion_reference: None,
        }
    }

    /// Sets the penalty and objective weights.
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Selects the capacity / no-overlap strategy.
    pub fn with_capacity_encoding(mut self, encoding: impl CapacityEncoding + 'static) -> Self {
        self.capacity = Box::new(encoding);
        self
    }

    /// Prunes entries below `epsilon` after every encoder stage.
    pub fn with_prune_epsilon(mut self, epsilon: f64) -> Self {
        self.prune_epsilon = Some(epsilon);
        self
    }

    /// Per-task completion-time targets; enables the reference form of
    /// the completion-time objective.
    pub fn with_completion_reference(mut self, reference: HashMap<String, f64>) -> Self {
        self.completion_reference = Some(reference);
        self
    }

    /// Runs the construction pass.
    ///
    /// Fails with [`QuboError::Validation`] before any variable is
    /// registered if the instance or the weights are invalid.
    pub fn build(&self) -> Result<QuboModel, QuboError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_instance(self.instance) {
            errors.extend(e);
        }
        if let Err(e) = self.weights.validate() {
            errors.extend(e);
        }
        if !errors.is_empty() {
            return Err(QuboError::Validation(errors));
        }

        let instance = self.instance;
        let w = &self.weights;
        let mut registry = VariableRegistry::new();
        let variables = assign_variables(instance, &mut registry);
        let mut qubo = Qubo::new();
        debug!(
            "registered {} variables for {} tasks, {} robots, {} slots",
            registry.len(),
            instance.tasks.len(),
            instance.robots.len(),
            instance.slots.len()
        );

        self.stage(&mut qubo, "exactly-one-slot", |q| {
            encode_exactly_one_slot(q, instance, &variables, w.exactly_one_slot)
        })?;
        self.stage(&mut qubo, "exactly-one-robot", |q| {
            encode_exactly_one_robot(q, instance, &variables, w.exactly_one_robot)
        })?;
        self.stage(&mut qubo, self.capacity.name(), |q| {
            self.capacity
                .encode(q, instance, &variables, w.link, w.capacity)
        })?;
        self.stage(&mut qubo, "consistency", |q| {
            encode_consistency(q, instance, &variables, w.consistency)
        })?;
        self.stage(&mut qubo, "precedence", |q| {
            encode_precedence(q, instance, &variables, w.precedence)
        })?;
        self.stage(&mut qubo, "completion-time", |q| {
            encode_completion_time(
                q,
                instance,
                &variables,
                w.completion_time,
                self.completion_reference.as_ref(),
            )
        })?;
        self.stage(&mut qubo, "workload-balance", |q| {
            encode_workload_balance(q, instance, &variables, w.balance)
        })?;

        let model = QuboModel {
            registry,
            variables,
            qubo,
        };
        let stats = model.stats();
        info!(
            "built QUBO: {} variables, {} entries ({} linear, {} quadratic), density {:.4}",
            stats.num_variables,
            stats.num_entries,
            stats.num_linear,
            stats.num_quadratic,
            stats.density
        );
        Ok(model)
    }

    fn stage<F>(&self, qubo: &mut Qubo, name: &str, encode: F) -> Result<(), QuboError>
    where
        F: FnOnce(&mut Qubo) -> Result<(), QuboError>,
    {
        encode(qubo)?;
        let pruned = self.prune_epsilon.map_or(0, |eps| qubo.prune(eps));
        debug!("stage {name}: {} entries, {pruned} pruned", qubo.len());
        Ok(())
    }
}

/// A constructed model: registry, lookup tables, and coefficients.
#[derive(Debug, Clone)]
pub struct QuboModel {
    registry: VariableRegistry,
    variables: VariableTables,
    qubo: Qubo,
}

impl QuboModel {
    /// Number of registered variables.
    pub fn num_variables(&self) -> usize {
        self.registry.len()
    }

    /// Variable registry (handle ↔ identity).
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Forward lookup tables.
    pub fn variables(&self) -> &VariableTables {
        &self.variables
    }

    /// Coefficients.
    pub fn qubo(&self) -> &Qubo {
        &self.qubo
    }

    /// Mutable coefficients, for caller-side pruning or scaling.
    pub fn qubo_mut(&mut self) -> &mut Qubo {
        &mut self.qubo
    }

    /// Statistics over all registered variables.
    pub fn stats(&self) -> QuboStats {
        self.qubo.stats(self.registry.len())
    }

    /// Dense matrix labeled with variable identities.
    pub fn dense(&self) -> DenseMatrix<VarKey> {
        self.qubo.materialize_labeled(self.registry.len(), &self.registry)
    }

    /// Energy of a dense binary sample.
    pub fn energy(&self, sample: &[bool]) -> f64 {
        self.qubo.energy(sample)
    }

    /// Reverse lookup tables for decoding.
    pub fn reverse_tables(&self) -> ReverseTables {
        self.variables.reverse()
    }

    /// Decodes `(handle, value)` pairs returned by a solver.
    pub fn decode<I>(&self, sample: I) -> DecodedSample
    where
        I: IntoIterator<Item = (usize, u8)>,
    {
        decode_sample(sample, &self.reverse_tables())
    }

    /// Decodes a dense binary sample.
    pub fn decode_bits(&self, sample: &[bool]) -> DecodedSample {
        decode_bits(sample, &self.reverse_tables())
    }

    /// Dense sample selecting exactly the variables in `decoded`.
    pub fn encode_selection(&self, decoded: &DecodedSample) -> Vec<bool> {
        decoded.to_sample(&self.variables, self.registry.len())
    }

    /// Rebuilds the schedule a dense sample describes.
    pub fn schedule(&self, instance: &ProblemInstance, sample: &[bool]) -> Schedule {
        Schedule::from_decoded(instance, &self.decode_bits(sample))
    }

    /// Splits the model into its parts.
    pub fn into_parts(self) -> (VariableRegistry, VariableTables, Qubo) {
        (self.registry, self.variables, self.qubo)
    }
}
