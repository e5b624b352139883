//! Test helpers shared by the encoder tests.

use crate::models::ProblemInstance;
use crate::registry::VariableRegistry;
use crate::variables::{assign_variables, VariableTables};

/// Registers all variables of `instance`.
pub(crate) fn setup(instance: &ProblemInstance) -> (VariableRegistry, VariableTables) {
    let mut reg = VariableRegistry::new();
    let vars = assign_variables(instance, &mut reg);
    (reg, vars)
}

/// Dense sample with exactly the handles in `ones` set.
pub(crate) fn sample_with(reg: &VariableRegistry, ones: &[usize]) -> Vec<bool> {
    let mut sample = vec![false; reg.len()];
    for &i in ones {
        sample[i] = true;
    }
    sample
}
