//! # System Constants
//!
//! Shared constants for queue topology, priority bounds, and progress
//! tracking, kept in one place so the dispatcher, worker, and reconciler
//! never drift apart on names or limits.

/// Default broker topology names, overridable through the environment
pub mod topology {
    /// Durable priority queue carrying task-start messages
    pub const TASK_QUEUE: &str = "taskhelm_tasks";

    /// Durable queue carrying worker lifecycle reports
    pub const REPORT_QUEUE: &str = "taskhelm_reports";

    /// Durable direct exchange routing commands by task id
    pub const COMMAND_EXCHANGE: &str = "taskhelm_commands";
}

/// Task priority bounds (maps to the AMQP message priority property)
pub mod priority {
    /// Lowest accepted priority
    pub const MIN: u8 = 1;

    /// Highest accepted priority; also the work queue's `x-max-priority`
    pub const MAX: u8 = 5;

    /// Priority applied when the caller does not supply one
    pub const DEFAULT: u8 = 1;
}

/// Progress tracking bounds
pub mod progress {
    /// Progress value at task creation and after restart
    pub const INITIAL: i32 = 0;

    /// Progress value that completes a task
    pub const COMPLETE: i32 = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_bounds_ordered() {
        assert!(priority::MIN <= priority::DEFAULT);
        assert!(priority::DEFAULT <= priority::MAX);
    }

    #[test]
    fn test_progress_bounds() {
        assert_eq!(progress::INITIAL, 0);
        assert_eq!(progress::COMPLETE, 100);
    }
}
