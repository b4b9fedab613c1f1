//! Library root for `incident-triage`.
//!
//! Incident-triage is a local-first assistant for on-call engineers designed to:
//! - Turn a free-text incident description into a structured triage report
//! - Propose immediate and stabilization actions, escalation targets, and a stakeholder update
//! - Ground the report's severity and domain in the incident text rather than the model's guess
//!
//! The assistant talks to any OpenAI-compatible endpoint (a local Ollama server by default).
//! Model output is untrusted: the `triage` module extracts the report from noisy responses
//! and re-derives the safety-critical fields with deterministic rules.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;
pub mod triage;

use base::{config::Config, types::Void};
use runtime::{RunMode, Runtime};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Builds the runtime context with the LLM client and triage service, then either
/// runs the interactive console or triages a single incident.
pub async fn start(config: Config, mode: RunMode) -> Void {
    info!("Starting incident-triage ...");

    // Initialize the runtime.
    let runtime = Runtime::new(config);

    // Start the runtime.
    runtime.start(mode).await?;

    Ok(())
}
