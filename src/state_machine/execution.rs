//! # Task Execution State Machine
//!
//! A pure, in-memory machine: one transition function over (state, event)
//! pairs that mutates the machine and returns the lifecycle reports to
//! publish. All side effects (timers, broker publishes, acks) live in the
//! worker runtime, which keeps every transition testable in isolation.

use uuid::Uuid;

use super::events::ExecutionEvent;
use super::states::ExecutionState;
use crate::constants::progress;
use crate::messaging::Report;

/// The single task a worker is currently executing
#[derive(Debug, Clone, PartialEq)]
pub struct TaskExecution {
    task_id: Uuid,
    state: ExecutionState,
    progress: i32,
}

impl TaskExecution {
    /// Create a machine for a freshly dequeued task, already running
    ///
    /// Returns the machine along with the STARTED report to publish.
    pub fn start(task_id: Uuid) -> (Self, Vec<Report>) {
        let execution = Self {
            task_id,
            state: ExecutionState::Running,
            progress: progress::INITIAL,
        };
        let reports = vec![Report::started(task_id)];
        (execution, reports)
    }

    /// Apply an event, returning the reports the transition produced
    ///
    /// Events that are invalid for the current state return no reports and
    /// change nothing; late or duplicated commands are expected traffic,
    /// not errors.
    pub fn apply(&mut self, event: &ExecutionEvent) -> Vec<Report> {
        match (self.state, event) {
            // Progress ticks, only while running
            (ExecutionState::Running, ExecutionEvent::Tick { step }) => {
                self.progress = (self.progress + step).min(progress::COMPLETE);
                if self.progress >= progress::COMPLETE {
                    self.state = ExecutionState::Completed;
                    vec![Report::completed(self.task_id)]
                } else {
                    vec![Report::progress(self.task_id, self.progress)]
                }
            }

            // Faults end the execution whether running or paused
            (
                ExecutionState::Running | ExecutionState::Paused,
                ExecutionEvent::Fault { message },
            ) => {
                self.state = ExecutionState::Failed;
                vec![Report::error(self.task_id, message.clone())]
            }

            // Pause and resume toggle tick production
            (ExecutionState::Running, ExecutionEvent::Pause) => {
                self.state = ExecutionState::Paused;
                vec![Report::paused(self.task_id)]
            }
            (ExecutionState::Paused, ExecutionEvent::Resume) => {
                self.state = ExecutionState::Running;
                vec![Report::resumed(self.task_id)]
            }

            // Cancellation is valid from running or paused
            (ExecutionState::Running | ExecutionState::Paused, ExecutionEvent::Cancel) => {
                self.state = ExecutionState::Cancelled;
                vec![Report::cancelled(self.task_id)]
            }

            // Restart resets the run from any state the worker still owns
            (_, ExecutionEvent::Restart) => {
                self.progress = progress::INITIAL;
                self.state = ExecutionState::Running;
                vec![Report::restarted(self.task_id), Report::started(self.task_id)]
            }

            // Everything else is a legitimate no-op
            _ => Vec::new(),
        }
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    /// Check if the execution has ended
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Check if the execution should be receiving ticks
    pub fn is_running(&self) -> bool {
        self.state == ExecutionState::Running
    }
}
