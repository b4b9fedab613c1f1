//! Core components, types, and utilities for the incident triage assistant.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System prompts and request templates for LLM interactions.
//! - Report, classification, and chat types, plus result handling.
//! - Cooperative cancellation for streamed requests.

pub mod cancellation;
pub mod config;
pub mod prompts;
pub mod types;
