//! Scheduling-to-QUBO formulation for the U-Engine ecosystem.
//!
//! Translates a multi-robot, slot-discretized scheduling problem into a
//! Quadratic Unconstrained Binary Optimization model. The crate only
//! formulates and decodes: solving is left to an external QUBO solver
//! (annealer, sampler, or exact enumerator).
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ProblemInstance`, `Task`, `Precedence`,
//!   `Schedule`, `Assignment`, `Violation`
//! - **`validation`**: Input integrity checks (empty sets, duplicate IDs,
//!   unknown or cyclic precedence, invalid weights)
//! - **`registry`**: Bijective variable identity ↔ dense handle map
//! - **`variables`**: Registration of the `x`, `y`, `w` variable families
//! - **`qubo`**: Sparse coefficient accumulator and penalty primitives
//! - **`encoders`**: Constraint and objective encoders, capacity strategies
//! - **`builder`**: One-pass model construction (`QuboBuilder`)
//! - **`decode`**: Sample → selected variables
//! - **`kpi`**: Schedule quality metrics
//!
//! # Variables
//!
//! | Family | Meaning |
//! |--------|---------|
//! | `x[t,r]` | task `t` runs on robot `r` |
//! | `y[t,z]` | task `t` starts at slot `z` |
//! | `w[t,r,z]` | task `t` keeps robot `r` busy during slot `z` |
//!
//! # References
//!
//! - Lucas (2014), "Ising formulations of many NP problems"
//! - Glover, Kochenberger & Du (2019), "Quantum Bridge Analytics I"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod builder;
pub mod decode;
pub mod encoders;
pub mod error;
pub mod kpi;
pub mod models;
pub mod qubo;
pub mod registry;
pub mod validation;
pub mod variables;

pub use builder::{QuboBuilder, QuboModel};
pub use encoders::{CapacityEncoding, ExactCapacity, PenaltyWeights, RelaxedCapacity};
pub use error::QuboError;
pub use qubo::Qubo;
pub use registry::{VarKey, VariableRegistry};
