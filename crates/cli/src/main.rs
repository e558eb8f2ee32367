//! `easel` -- run ComfyUI workflows from the command line.
//!
//! Submits a workflow JSON file to a ComfyUI server, waits for completion,
//! and prints the output mapping as JSON on stdout. `easel describe` prints
//! the capability descriptor a hosting platform registers instead.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default | Description                          |
//! |---------------------------|----------|---------|--------------------------------------|
//! | `COMFYUI_API_URL`         | yes      | --      | Base URL, e.g. `http://host:8188`    |
//! | `COMFYUI_API_KEY`         | no       | --      | Bearer credential, if auth is enabled|
//! | `COMFYUI_TIMEOUT_MINUTES` | no       | `30`    | Completion-wait budget in minutes    |

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easel_comfyui::{registration, Endpoint, PollConfig, WorkflowRunner};

/// Environment override for the timeout budget.
const TIMEOUT_ENV: &str = "COMFYUI_TIMEOUT_MINUTES";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("describe") => {
            println!(
                "{}",
                serde_json::to_string_pretty(&registration::capability())?
            );
            Ok(())
        }
        Some(path) => run_workflow(path).await,
        None => {
            eprintln!("usage: easel <workflow.json> | easel describe");
            std::process::exit(2);
        }
    }
}

/// Read a workflow file, run it against the configured server, and print
/// the resulting output mapping.
async fn run_workflow(path: &str) -> anyhow::Result<()> {
    let workflow = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read workflow file {path}"))?;

    let endpoint = Endpoint::resolve(None, None)?;

    let timeout_minutes = std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(easel_comfyui::runner::DEFAULT_TIMEOUT_MINUTES);

    tracing::info!(
        server = %endpoint.base_url(),
        timeout_minutes,
        workflow_file = %path,
        "Running workflow",
    );

    let runner =
        WorkflowRunner::new(&endpoint).with_config(PollConfig::with_timeout_minutes(timeout_minutes));
    let outputs = runner.run(&workflow).await?;

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}
