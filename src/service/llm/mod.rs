//! Integration with Large Language Model services.
//!
//! This module provides a thin chat transport: an ordered list of role-tagged messages goes
//! in, and either the full response text or a lazy stream of text fragments comes out.
//!
//! The module defines the `GenericLlmClient` trait that can be implemented
//! for different LLM providers, with a default implementation for any
//! OpenAI-compatible endpoint (e.g., a local Ollama server).

pub mod openai;

use std::{future::ready, ops::Deref, pin::Pin, sync::Arc};

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::base::{
    cancellation::CancellationToken,
    types::{ChatMessage, Res},
};

// Types.

/// A lazily consumed sequence of response text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Res<String>> + Send>>;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large language models.
/// Implementing this trait allows different LLM providers to be used for triage.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Send the messages and wait for the complete, trimmed response text.
    ///
    /// Returns an error if `cancel` fires before the response is complete.
    async fn chat(&self, messages: &[ChatMessage], cancel: &CancellationToken) -> Res<String>;

    /// Send the messages and stream back non-empty response fragments as they arrive.
    ///
    /// The stream ends early once `cancel` fires.
    async fn chat_stream(&self, messages: &[ChatMessage], cancel: &CancellationToken) -> Res<FragmentStream>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    /// Wrap a concrete client implementation.
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}

// Helpers.

/// Stop yielding fragments once `cancel` fires.
pub fn until_cancelled<S>(stream: S, cancel: CancellationToken) -> FragmentStream
where
    S: Stream<Item = Res<String>> + Send + 'static,
{
    stream.take_while(move |_| ready(!cancel.is_cancelled())).boxed()
}

/// Drain a fragment stream into a single trimmed string.
pub async fn collect_fragments(mut stream: FragmentStream, cancel: &CancellationToken) -> Res<String> {
    let mut text = String::new();

    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?);
    }

    if cancel.is_cancelled() {
        return Err(anyhow::anyhow!("Chat request was cancelled."));
    }

    Ok(text.trim().to_string())
}
