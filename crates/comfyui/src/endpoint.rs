//! ComfyUI server endpoint resolution.
//!
//! An [`Endpoint`] is the base HTTP URL of a ComfyUI instance plus an
//! optional bearer credential, fixed for the duration of one run. Both
//! values can come from an explicit parameter or fall back to environment
//! variables; the explicit parameter wins when it is non-blank.

use easel_core::resolve::{env_opt, first_non_empty};

use crate::error::RunError;

/// Environment fallback for the server address.
pub const API_URL_ENV: &str = "COMFYUI_API_URL";
/// Environment fallback for the bearer credential.
pub const API_KEY_ENV: &str = "COMFYUI_API_KEY";

const MISSING_URL: &str = "no ComfyUI server address configured; set the apiUrl parameter \
                           or the COMFYUI_API_URL environment variable";

/// Address and credential of one ComfyUI instance.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    api_key: Option<String>,
}

impl Endpoint {
    /// Build an endpoint from an explicit address.
    ///
    /// The address is trimmed and stripped of trailing slashes so it can be
    /// joined with path segments directly. A blank address is a
    /// [`RunError::Validation`].
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, RunError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RunError::Validation(MISSING_URL.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
        })
    }

    /// Resolve an endpoint from an explicit parameter with environment
    /// fallback.
    ///
    /// Precedence per value: explicit parameter, then environment variable.
    /// A missing credential is fine (the server may not require one); a
    /// missing address is a [`RunError::Validation`].
    pub fn resolve(
        explicit_url: Option<String>,
        explicit_key: Option<String>,
    ) -> Result<Self, RunError> {
        let url = first_non_empty([explicit_url, env_opt(API_URL_ENV)]);
        let key = first_non_empty([explicit_key, env_opt(API_KEY_ENV)]);
        match url {
            Some(url) => Self::new(url, key),
            None => Err(RunError::Validation(MISSING_URL.to_string())),
        }
    }

    /// Base HTTP URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer credential, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}
