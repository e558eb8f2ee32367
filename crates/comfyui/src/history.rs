//! Typed model of the ComfyUI `/history/{prompt_id}` response.
//!
//! The endpoint returns a JSON object keyed by prompt id. Each entry grows
//! fields as the execution progresses: `status` appears once the server has
//! started tracking the run, `outputs` once nodes have produced results.
//! Absent fields deserialize to `None` so a partially-populated entry never
//! fails to parse.

use std::collections::HashMap;

use serde::Deserialize;

/// The full `/history/{prompt_id}` response: a map keyed by prompt id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct HistoryResponse {
    pub entries: HashMap<String, HistoryEntry>,
}

/// One execution record in the history map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    /// Execution status; absent while the run is still queued.
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    /// Output data keyed by producing node id; absent until nodes finish.
    #[serde(default)]
    pub outputs: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Terminal-state information for one execution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionStatus {
    #[serde(default)]
    pub completed: bool,
    /// Outcome label; `"error"` marks a failed execution.
    #[serde(default)]
    pub status_str: Option<String>,
}

impl HistoryResponse {
    /// Look up the record for a prompt, if the server has one yet.
    pub fn entry(&self, prompt_id: &str) -> Option<&HistoryEntry> {
        self.entries.get(prompt_id)
    }
}

impl ExecutionStatus {
    /// Whether the server reported the execution as failed.
    pub fn is_error(&self) -> bool {
        self.status_str.as_deref() == Some("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_completed_entry_with_outputs() {
        let json = r#"{
            "abc": {
                "status": {"completed": true, "status_str": "success"},
                "outputs": {"9": {"images": [{"filename": "out.png", "subfolder": "", "type": "output"}]}}
            }
        }"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        let entry = history.entry("abc").unwrap();
        let status = entry.status.as_ref().unwrap();
        assert!(status.completed);
        assert!(!status.is_error());
        let outputs = entry.outputs.as_ref().unwrap();
        assert!(outputs.contains_key("9"));
    }

    #[test]
    fn parse_error_entry() {
        let json = r#"{"abc": {"status": {"completed": true, "status_str": "error"}}}"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        let entry = history.entry("abc").unwrap();
        assert!(entry.status.as_ref().unwrap().is_error());
        assert!(entry.outputs.is_none());
    }

    #[test]
    fn parse_entry_without_status() {
        let json = r#"{"abc": {"outputs": {}}}"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        let entry = history.entry("abc").unwrap();
        assert!(entry.status.is_none());
    }

    #[test]
    fn parse_empty_history() {
        let history: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(history.entry("abc").is_none());
    }

    #[test]
    fn status_without_status_str_is_not_an_error() {
        let json = r#"{"abc": {"status": {"completed": true}}}"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        let status = history.entry("abc").unwrap().status.as_ref().unwrap();
        assert!(status.completed);
        assert!(!status.is_error());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "abc": {
                "prompt": [1, "abc", {}],
                "status": {"completed": false, "messages": [["execution_start", {}]]},
                "meta": {}
            }
        }"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        let status = history.entry("abc").unwrap().status.as_ref().unwrap();
        assert!(!status.completed);
    }
}
