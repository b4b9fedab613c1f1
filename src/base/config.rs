//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;
use url::Url;

use super::types::Res;

/// Default model provider label.
fn default_provider() -> String {
    "ollama".to_string()
}

/// Default OpenAI-compatible endpoint (a local Ollama server).
fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

/// Default API key (Ollama ignores it, but the client requires one).
fn default_api_key() -> String {
    "ollama".to_string()
}

/// Default model to use.
fn default_model_id() -> String {
    "mistral:7b".to_string()
}

/// Default sampling temperature.
fn default_temperature() -> f32 {
    0.1
}

/// Default max output tokens.
fn default_max_output_tokens() -> u32 {
    800
}

/// Configuration for the incident triage application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Configuration values.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Model provider label, informational only (`INCIDENT_TRIAGE_PROVIDER`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// OpenAI-compatible API base URL (`INCIDENT_TRIAGE_BASE_URL`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key for the endpoint (`INCIDENT_TRIAGE_API_KEY`).
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Model identifier (`INCIDENT_TRIAGE_MODEL_ID`).
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Sampling temperature (`INCIDENT_TRIAGE_TEMPERATURE`).
    /// Value between 0 and 2. Lower values make output more focused and deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Max output tokens (`INCIDENT_TRIAGE_MAX_OUTPUT_TOKENS`).
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            api_key: default_api_key(),
            model_id: default_model_id(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Config {
    /// Load the configuration from the environment and an optional TOML file, then validate it.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("INCIDENT_TRIAGE").prefix_separator("_"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the configured values.
    pub fn validate(&self) -> Res<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("Base URL is required."));
        }

        if Url::parse(&self.base_url).is_err() {
            return Err(anyhow::anyhow!("Base URL must be an absolute URL."));
        }

        if self.model_id.trim().is_empty() {
            return Err(anyhow::anyhow!("Model ID is required."));
        }

        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API key is required."));
        }

        if self.max_output_tokens < 1 {
            return Err(anyhow::anyhow!("Max output tokens must be greater than zero."));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow::anyhow!("Temperature must be between 0 and 2."));
        }

        Ok(())
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}
