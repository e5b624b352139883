//! Scheduling domain models.
//!
//! Input side: a [`ProblemInstance`] of robots, discrete start slots,
//! tasks with integer durations, and precedence edges. Output side: a
//! [`Schedule`] rebuilt from a decoded solver sample.
//!
//! # Domain Mappings
//!
//! | u-qubo | Manufacturing | Warehouse | Logistics |
//! |--------|--------------|-----------|-----------|
//! | Task | Operation | Pick Order | Shipment |
//! | Robot | Machine | AGV | Truck |
//! | Slot | Shift Period | Time Step | Dispatch Window |
//! | Schedule | Production Plan | Pick Plan | Route Plan |

mod instance;
mod precedence;
mod schedule;
mod task;

pub use instance::ProblemInstance;
pub use precedence::Precedence;
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
pub use task::{Slot, Task};
