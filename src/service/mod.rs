//! Service integrations for external APIs and clients.
//!
//! This module contains the services used by the incident triage assistant:
//! - LLM chat transport (e.g., Ollama or any OpenAI-compatible endpoint)
//! - The triage service that turns model output into enforced reports
//!
//! The LLM service defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod llm;
pub mod triage;
