//! Run-phase events and the progress observer.
//!
//! The runner reports phase transitions through an injected
//! [`RunObserver`] rather than logging directly, keeping the poll logic
//! pure and testable. [`TracingObserver`] is the default sink and forwards
//! every event to [`tracing`].

use serde::Serialize;

/// A phase transition during one workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunEvent {
    /// The reachability probe succeeded.
    ServerReachable,

    /// The workflow was accepted and queued.
    JobSubmitted { prompt_id: String },

    /// One status poll is about to be issued.
    PollAttempted { attempt: u64, max_attempts: u64 },

    /// The execution finished successfully and outputs were collected.
    JobCompleted { prompt_id: String },
}

/// Sink for run-phase events.
///
/// Implementations must be cheap and non-blocking; the runner calls them
/// inline between protocol steps.
pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent);
}

/// Default observer: forwards events to [`tracing`].
///
/// Phase transitions log at info level; per-poll attempts at debug to keep
/// long waits quiet under the default filter.
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_event(&self, event: &RunEvent) {
        match event {
            RunEvent::ServerReachable => {
                tracing::info!("ComfyUI server is reachable");
            }
            RunEvent::JobSubmitted { prompt_id } => {
                tracing::info!(prompt_id = %prompt_id, "Workflow queued");
            }
            RunEvent::PollAttempted {
                attempt,
                max_attempts,
            } => {
                tracing::debug!(attempt, max_attempts, "Checking execution status");
            }
            RunEvent::JobCompleted { prompt_id } => {
                tracing::info!(prompt_id = %prompt_id, "Execution completed");
            }
        }
    }
}
