//! Chat transport over any OpenAI-compatible chat completions endpoint.

use std::{future::ready, sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionResponseStream,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::base::{
    cancellation::CancellationToken,
    config::Config,
    types::{ChatMessage, ChatRole, Res},
};

use super::{FragmentStream, GenericLlmClient, LlmClient, collect_fragments, until_cancelled};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    /// Create a client for the configured OpenAI-compatible endpoint.
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI-compatible LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new client pointed at the configured base URL.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_base(config.base_url.clone()).with_api_key(config.api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build a streaming chat completion request for the configured model.
    fn build_request(&self, messages: &[ChatMessage]) -> Res<CreateChatCompletionRequest> {
        Ok(CreateChatCompletionRequestArgs::default()
            .model(&self.config.model_id)
            .messages(build_openai_messages(messages)?)
            .temperature(self.config.temperature)
            .max_completion_tokens(self.config.max_output_tokens)
            .stream(true)
            .build()?)
    }

    /// Helper function to open the response stream with retry logic and timeout handling.
    async fn open_stream(&self, request: CreateChatCompletionRequest, cancel: &CancellationToken) -> Res<ChatCompletionResponseStream> {
        const MAX_RETRIES: u32 = 2;
        const TIMEOUT: u64 = 120; // Local models can take a while to load on first use.
        const RETRY_DELAY_MS: u64 = 500;

        let mut retries = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(anyhow::anyhow!("Chat request was cancelled."));
            }

            let result = timeout(Duration::from_secs(TIMEOUT), self.client.chat().create_stream(request.clone())).await;

            let failure = match result {
                Ok(Ok(stream)) => {
                    info!("Chat stream opened after {} attempts", retries + 1);
                    return Ok(stream);
                }
                Ok(Err(err)) => err.to_string(),
                Err(_) => "timed out".to_string(),
            };

            if retries >= MAX_RETRIES {
                return Err(anyhow::anyhow!("Chat request failed after {MAX_RETRIES} retries: {failure}"));
            }

            retries += 1;
            warn!("Chat request failed, retrying {retries}/{MAX_RETRIES}: {failure}");

            let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(retries - 1));
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::chat", skip_all)]
    async fn chat(&self, messages: &[ChatMessage], cancel: &CancellationToken) -> Res<String> {
        let stream = self.chat_stream(messages, cancel).await?;

        collect_fragments(stream, cancel).await
    }

    #[instrument(name = "OpenAiLlmClient::chat_stream", skip_all, fields(model = %self.config.model_id))]
    async fn chat_stream(&self, messages: &[ChatMessage], cancel: &CancellationToken) -> Res<FragmentStream> {
        let request = self.build_request(messages)?;
        let stream = self.open_stream(request, cancel).await?;

        let fragments = stream
            .map(|chunk| -> Res<String> {
                let chunk = chunk?;
                Ok(chunk.choices.into_iter().filter_map(|choice| choice.delta.content).collect())
            })
            .try_filter(|fragment| ready(!fragment.is_empty()));

        Ok(until_cancelled(fragments, cancel.clone()))
    }
}

/// Convert chat messages into OpenAI request messages.
pub fn build_openai_messages(messages: &[ChatMessage]) -> Res<Vec<ChatCompletionRequestMessage>> {
    messages
        .iter()
        .map(|message| -> Res<ChatCompletionRequestMessage> {
            let content = message.content.as_str();

            Ok(match message.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default().content(content).build()?.into(),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default().content(content).build()?.into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default().content(content).build()?.into(),
            })
        })
        .collect()
}

// Tests.
