//! Task state machine.
//!
//! # States
//! - Created: constructed, transport not started
//! - Executing: transport call in flight
//! - Resolved / Rejected: terminal
//!
//! # State Transitions
//! ```text
//! Created → Executing: first execute()
//! Created | Executing → Resolved: resolve()
//! Created | Executing → Rejected: reject()
//! ```

/// Lifecycle state of a task.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created = 0,
    Executing = 1,
    Resolved = 2,
    Rejected = 3,
}

impl TaskState {
    /// Whether the state is terminal.
    pub fn is_settled(self) -> bool {
        matches!(self, TaskState::Resolved | TaskState::Rejected)
    }
}

impl From<u8> for TaskState {
    fn from(val: u8) -> Self {
        match val {
            1 => TaskState::Executing,
            2 => TaskState::Resolved,
            3 => TaskState::Rejected,
            _ => TaskState::Created,
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskState::Created => "created",
            TaskState::Executing => "executing",
            TaskState::Resolved => "resolved",
            TaskState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
