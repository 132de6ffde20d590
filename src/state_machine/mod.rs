//! # State Machine
//!
//! The worker-side task lifecycle: an explicit finite-state machine with a
//! single transition function over (state, event) pairs. Transitions return
//! the lifecycle reports to publish instead of performing side effects,
//! which is what lets the worker runtime stay a thin timer and command
//! pump around it.

pub mod events;
pub mod execution;
pub mod states;

pub use events::ExecutionEvent;
pub use execution::TaskExecution;
pub use states::ExecutionState;
