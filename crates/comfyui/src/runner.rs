//! Workflow submission and completion polling.
//!
//! [`WorkflowRunner`] drives one workflow through the full protocol:
//! reachability probe, submission, a fixed grace period, then a bounded
//! status-poll loop against `/history/{prompt_id}`. Every run ends in
//! exactly one of: outputs returned, execution error, timeout, or a fatal
//! validation/transport error.

use std::sync::Arc;
use std::time::Duration;

use crate::api::ComfyUIApi;
use crate::endpoint::Endpoint;
use crate::error::RunError;
use crate::events::{RunEvent, RunObserver, TracingObserver};
use crate::history::HistoryEntry;

/// Output data keyed by producing node id, returned unchanged on success.
pub type JobOutputs = serde_json::Map<String, serde_json::Value>;

/// Status polls per minute of timeout budget (one per second).
const ATTEMPTS_PER_MINUTE: u64 = 60;

/// Default timeout budget in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 30;

/// Tunable cadence for the completion-poll loop.
///
/// The attempt budget is always `60 × timeout_minutes`; `initial_grace` and
/// `interval` only control real-time pacing, so tests can poll at
/// millisecond cadence without changing the budget semantics.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Timeout budget in minutes; also determines the attempt budget.
    pub timeout_minutes: u64,
    /// Delay between submission and the first poll, giving the server time
    /// to register the prompt.
    pub initial_grace: Duration,
    /// Delay before each poll attempt.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            initial_grace: Duration::from_secs(5),
            interval: Duration::from_secs(1),
        }
    }
}

impl PollConfig {
    /// Default cadence with a caller-supplied timeout budget.
    pub fn with_timeout_minutes(timeout_minutes: u64) -> Self {
        Self {
            timeout_minutes,
            ..Default::default()
        }
    }

    /// Maximum number of status polls before the run times out.
    pub fn max_attempts(&self) -> u64 {
        self.timeout_minutes.saturating_mul(ATTEMPTS_PER_MINUTE)
    }
}

/// Executes ComfyUI workflows and waits for their results.
pub struct WorkflowRunner {
    api: ComfyUIApi,
    config: PollConfig,
    observer: Arc<dyn RunObserver>,
}

impl WorkflowRunner {
    /// Create a runner for the given endpoint with default poll cadence and
    /// tracing-backed progress reporting.
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            api: ComfyUIApi::new(endpoint),
            config: PollConfig::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the poll cadence.
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run a workflow to completion and return its output mapping.
    ///
    /// `workflow_text` is the workflow document as JSON text; it is parsed
    /// here and passed through to the server opaquely.
    pub async fn run(&self, workflow_text: &str) -> Result<JobOutputs, RunError> {
        self.api
            .system_stats()
            .await
            .map_err(|e| RunError::Transport(format!("ComfyUI is unreachable: {e}")))?;
        self.observer.on_event(&RunEvent::ServerReachable);

        let workflow: serde_json::Value = serde_json::from_str(workflow_text)
            .map_err(|e| RunError::Validation(format!("workflow is not valid JSON: {e}")))?;

        let submitted = self.api.submit_workflow(&workflow).await?;
        let prompt_id = submitted
            .prompt_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RunError::Transport("ComfyUI returned no prompt id".to_string()))?;
        self.observer.on_event(&RunEvent::JobSubmitted {
            prompt_id: prompt_id.clone(),
        });

        tokio::time::sleep(self.config.initial_grace).await;

        let max_attempts = self.config.max_attempts();
        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.config.interval).await;
            self.observer.on_event(&RunEvent::PollAttempted {
                attempt,
                max_attempts,
            });

            let history = self.api.get_history(&prompt_id).await?;
            match poll_outcome(history.entry(&prompt_id)) {
                PollOutcome::Pending => {
                    tracing::debug!(prompt_id = %prompt_id, attempt, "Execution not finished yet");
                }
                PollOutcome::Errored => {
                    return Err(RunError::Execution("workflow execution failed".to_string()));
                }
                PollOutcome::NoOutputs => {
                    return Err(RunError::Execution(
                        "workflow completed but produced no outputs".to_string(),
                    ));
                }
                PollOutcome::Ready(outputs) => {
                    self.observer.on_event(&RunEvent::JobCompleted {
                        prompt_id: prompt_id.clone(),
                    });
                    return Ok(outputs);
                }
            }
        }

        Err(RunError::Timeout {
            minutes: self.config.timeout_minutes,
        })
    }
}

/// What one status poll concluded about the execution.
#[derive(Debug, Clone, PartialEq)]
enum PollOutcome {
    /// No entry, no status, or not yet completed.
    Pending,
    /// Completed with an error outcome.
    Errored,
    /// Completed cleanly but the entry carries no output mapping.
    NoOutputs,
    /// Completed cleanly; outputs ready to hand back.
    Ready(JobOutputs),
}

/// Classify a history entry into a poll outcome.
///
/// A missing entry or missing status is indistinguishable from "still
/// queued" on the wire, so both count as pending.
fn poll_outcome(entry: Option<&HistoryEntry>) -> PollOutcome {
    let Some(entry) = entry else {
        return PollOutcome::Pending;
    };
    let Some(status) = &entry.status else {
        return PollOutcome::Pending;
    };
    if !status.completed {
        return PollOutcome::Pending;
    }
    if status.is_error() {
        return PollOutcome::Errored;
    }
    match &entry.outputs {
        Some(outputs) => PollOutcome::Ready(outputs.clone()),
        None => PollOutcome::NoOutputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ExecutionStatus;

    fn entry(status: Option<ExecutionStatus>, outputs: Option<&str>) -> HistoryEntry {
        HistoryEntry {
            status,
            outputs: outputs.map(|json| serde_json::from_str(json).unwrap()),
        }
    }

    #[test]
    fn absent_entry_is_pending() {
        assert_eq!(poll_outcome(None), PollOutcome::Pending);
    }

    #[test]
    fn entry_without_status_is_pending() {
        let e = entry(None, Some(r#"{"9": {}}"#));
        assert_eq!(poll_outcome(Some(&e)), PollOutcome::Pending);
    }

    #[test]
    fn uncompleted_status_is_pending() {
        let e = entry(
            Some(ExecutionStatus {
                completed: false,
                status_str: None,
            }),
            None,
        );
        assert_eq!(poll_outcome(Some(&e)), PollOutcome::Pending);
    }

    #[test]
    fn error_status_wins_even_with_outputs_present() {
        let e = entry(
            Some(ExecutionStatus {
                completed: true,
                status_str: Some("error".to_string()),
            }),
            Some(r#"{"9": {"images": []}}"#),
        );
        assert_eq!(poll_outcome(Some(&e)), PollOutcome::Errored);
    }

    #[test]
    fn completed_without_outputs_is_no_outputs() {
        let e = entry(
            Some(ExecutionStatus {
                completed: true,
                status_str: Some("success".to_string()),
            }),
            None,
        );
        assert_eq!(poll_outcome(Some(&e)), PollOutcome::NoOutputs);
    }

    #[test]
    fn completed_with_outputs_is_ready_and_unchanged() {
        let outputs_json = r#"{"9": {"images": [{"filename": "out.png"}]}}"#;
        let e = entry(
            Some(ExecutionStatus {
                completed: true,
                status_str: Some("success".to_string()),
            }),
            Some(outputs_json),
        );
        let expected: JobOutputs = serde_json::from_str(outputs_json).unwrap();
        assert_eq!(poll_outcome(Some(&e)), PollOutcome::Ready(expected));
    }

    #[test]
    fn default_config_matches_contract() {
        let config = PollConfig::default();
        assert_eq!(config.timeout_minutes, 30);
        assert_eq!(config.initial_grace, Duration::from_secs(5));
        assert_eq!(config.interval, Duration::from_secs(1));
    }

    #[test]
    fn attempt_budget_is_sixty_per_minute() {
        assert_eq!(PollConfig::with_timeout_minutes(1).max_attempts(), 60);
        assert_eq!(PollConfig::with_timeout_minutes(30).max_attempts(), 1800);
        assert_eq!(PollConfig::with_timeout_minutes(0).max_attempts(), 0);
    }

    #[test]
    fn attempt_budget_saturates() {
        let config = PollConfig::with_timeout_minutes(u64::MAX);
        assert_eq!(config.max_attempts(), u64::MAX);
    }
}
