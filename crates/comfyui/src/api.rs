//! REST client for the ComfyUI HTTP endpoints.
//!
//! Wraps the three endpoints the bridge depends on — health probe,
//! workflow submission, and history retrieval — using [`reqwest`]. When
//! the endpoint carries a credential, every request is sent with an
//! `Authorization: Bearer` header.

use serde::Deserialize;

use crate::endpoint::Endpoint;
use crate::history::HistoryResponse;

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Response returned by the ComfyUI `/prompt` endpoint.
///
/// `prompt_id` is optional on purpose: a server that answers 200 without an
/// id must surface as a transport failure, not a deserialization error.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued workflow.
    #[serde(default)]
    pub prompt_id: Option<String>,
    /// Position in the execution queue.
    #[serde(default)]
    pub number: Option<i64>,
}

/// Errors from the ComfyUI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ComfyUIApi {
    /// Create a new API client for a ComfyUI instance.
    pub fn new(endpoint: &Endpoint) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across runs).
    pub fn with_client(client: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url().to_string(),
            api_key: endpoint.api_key().map(str::to_string),
        }
    }

    /// Probe server reachability via `GET /system_stats`.
    ///
    /// The stats body itself is not interesting here; a success status is
    /// the signal that the server is up and the credential is accepted.
    pub async fn system_stats(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authorized(self.client.get(format!("{}/system_stats", self.base_url)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Submit a workflow for execution via `POST /prompt`.
    ///
    /// Returns the server-assigned `prompt_id` (when present) and queue
    /// position.
    pub async fn submit_workflow(
        &self,
        workflow: &serde_json::Value,
    ) -> Result<SubmitResponse, ApiError> {
        let body = serde_json::json!({ "prompt": workflow });

        let response = self
            .authorized(self.client.post(format!("{}/prompt", self.base_url)))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve execution history for a prompt via `GET /history/{id}`.
    ///
    /// While the execution is still queued or running, the returned map
    /// typically has no entry for the prompt yet.
    pub async fn get_history(&self, prompt_id: &str) -> Result<HistoryResponse, ApiError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/history/{}", self.base_url, prompt_id)),
            )
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Attach the bearer credential when one is configured.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ApiError::Api`] containing the status
    /// and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
