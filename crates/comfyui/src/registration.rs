//! Host registration for the ComfyUI integration.
//!
//! Declares the four host-facing parameters as a [`CapabilitySpec`] the
//! hosting platform consumes verbatim. The server address and credential
//! are optional here because they may instead come from the environment
//! fallback chain (see [`crate::endpoint`]).

use easel_core::registration::{CapabilitySpec, FieldKind, FieldSpec};

use crate::runner::DEFAULT_TIMEOUT_MINUTES;

/// Capability descriptor for registering this integration with a host.
pub fn capability() -> CapabilitySpec {
    CapabilitySpec::new(
        "comfyui",
        "ComfyUI",
        "Execute ComfyUI workflows and return their outputs",
        vec![
            FieldSpec::new("apiUrl", "API URL", FieldKind::Text)
                .with_description("The URL of your ComfyUI instance"),
            FieldSpec::new("apiKey", "API Key", FieldKind::Secret)
                .with_description("API key if authentication is enabled"),
            FieldSpec::new("workflow", "Workflow JSON", FieldKind::Json)
                .required()
                .with_description("The ComfyUI workflow in JSON format"),
            FieldSpec::new("timeout", "Timeout", FieldKind::Number)
                .with_default(serde_json::json!(DEFAULT_TIMEOUT_MINUTES))
                .with_description("Maximum time in minutes to wait for workflow completion"),
        ],
    )
}
