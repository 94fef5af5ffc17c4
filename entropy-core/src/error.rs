//! Error types for entropy-core.

use thiserror::Error;

use crate::task::TaskState;

/// Raised by the scorer when a task reaches it with values the mapping layer
/// should have sanitized. A bad score would silently corrupt the whole ranking,
/// so these are never papered over.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("task '{task_id}': decay threshold must be a positive number of days, got {days}")]
    InvalidDecayThreshold { task_id: String, days: f64 },

    #[error("task '{task_id}': score is not finite ({value})")]
    NonFiniteScore { task_id: String, value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FulfillmentError {
    #[error("task '{task_id}' cannot be completed from state {state:?}")]
    NotActive { task_id: String, state: TaskState },

    #[error("task '{task_id}' is not completed; nothing to undo")]
    NotCompleted { task_id: String },
}
