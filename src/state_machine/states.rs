//! Execution states for a task living inside a worker.
//!
//! These are worker-local states, distinct from the persisted task status:
//! there is no pending state here because a task message arriving is what
//! creates the machine, already running.

use std::fmt;

/// State of an in-worker task execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Producing progress ticks
    Running,
    /// Suspended by an operator, ticks withheld
    Paused,
    /// Reached full progress
    Completed,
    /// Stopped by an operator command
    Cancelled,
    /// Stopped by a fault
    Failed,
}

impl ExecutionState {
    /// Check if this state ends the execution
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
