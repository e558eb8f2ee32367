//! ComfyUI workflow execution bridge.
//!
//! Submits workflow JSON to a ComfyUI server over HTTP, polls the history
//! endpoint until the execution reaches a terminal state, and returns the
//! output mapping. Provides endpoint/credential resolution, typed history
//! parsing, run-phase events, and the capability descriptor the hosting
//! platform uses to register this integration.

pub mod api;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod history;
pub mod registration;
pub mod runner;

pub use endpoint::Endpoint;
pub use error::RunError;
pub use runner::{JobOutputs, PollConfig, WorkflowRunner};
