//! Caller-visible error type for workflow runs.

use crate::api::ApiError;

/// Everything that can go wrong while running a workflow.
///
/// All failures carry a human-readable message; none of them are retried
/// internally beyond the poll-attempt budget.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Bad caller input: missing server address or malformed workflow JSON.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server could not be reached, rejected a request, or answered
    /// without the expected fields.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server accepted the workflow but execution ended in failure, or
    /// completed without producing any outputs.
    #[error("execution failed: {0}")]
    Execution(String),

    /// The poll budget ran out before the execution reached a terminal state.
    #[error("execution timed out after {minutes} minutes")]
    Timeout {
        /// The configured timeout budget.
        minutes: u64,
    },
}

impl From<ApiError> for RunError {
    fn from(err: ApiError) -> Self {
        RunError::Transport(err.to_string())
    }
}
