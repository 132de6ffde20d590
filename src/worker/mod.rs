//! # Worker
//!
//! The consumer side: a single-task runtime around the execution state
//! machine, the command lease that routes operator commands to it, and the
//! work policy abstraction that stands in for real work.

pub mod command_lease;
pub mod policy;
pub mod runtime;

pub use command_lease::CommandLease;
pub use policy::{FixedWorkPolicy, SimulatedWorkPolicy, TickOutcome, WorkPlan, WorkPolicy};
pub use runtime::WorkerRuntime;
