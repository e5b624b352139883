//! Crate error type.

use thiserror::Error;

use crate::registry::VarKey;
use crate::validation::ValidationError;

/// Errors raised while loading an instance or constructing a model.
///
/// All failures are terminal: construction is deterministic, so the
/// caller fixes the input rather than retrying.
#[derive(Debug, Error)]
pub enum QuboError {
    /// The problem instance failed validation. No model is produced.
    #[error("invalid problem instance: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// An encoder referenced a variable that was never registered.
    #[error("unknown variable {0}")]
    UnknownVariable(VarKey),

    /// An encoder referenced a task the instance does not define.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// The JSON input could not be parsed.
    #[error("failed to parse input: {0}")]
    Parse(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
