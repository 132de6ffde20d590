//! Events that drive task execution transitions.

use crate::messaging::Command;

/// Events applied to an in-worker task execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// A unit of work elapsed; advance progress by `step`
    Tick { step: i32 },
    /// The work failed mid-tick
    Fault { message: String },
    /// Operator requested a pause
    Pause,
    /// Operator requested a resume
    Resume,
    /// Operator requested cancellation
    Cancel,
    /// Operator requested a restart from zero progress
    Restart,
}

impl ExecutionEvent {
    /// Create a fault event with the given message
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    /// Translate a wire command into an execution event
    ///
    /// Unknown commands have no event; the caller acknowledges and drops
    /// them.
    pub fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::CancelTask => Some(Self::Cancel),
            Command::PauseTask => Some(Self::Pause),
            Command::ResumeTask => Some(Self::Resume),
            Command::RestartTask => Some(Self::Restart),
            Command::Unknown => None,
        }
    }

    /// String representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Tick { .. } => "tick",
            Self::Fault { .. } => "fault",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
            Self::Restart => "restart",
        }
    }
}
