//! QUBO model storage and penalty primitives.
//!
//! - [`Qubo`]: sparse upper-triangular coefficient accumulator with offset
//! - [`QuboStats`], [`DenseMatrix`], [`QuboEntry`]: read-only exports
//! - [`penalty`]: algebraic expansions shared by the encoders

mod matrix;
pub mod penalty;

pub use matrix::{DenseMatrix, Qubo, QuboEntry, QuboStats, DEFAULT_PRUNE_EPSILON};
