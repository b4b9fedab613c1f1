//! Runtime services and shared state for the incident triage assistant.

use tokio::io::{BufReader, stdin, stdout};
use tracing::instrument;

use crate::{
    base::{config::Config, types::Void},
    interaction::console::{banner, run_console, stream_incident, triage_incident},
    service::{llm::LlmClient, triage::TriageService},
};

/// How the runtime should be driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Read incidents from stdin until `/exit`.
    Interactive,
    /// Triage a single incident and exit.
    Once { incident: String, stream: bool },
}

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the LLM client, and the triage service built on it.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The triage service instance.
    pub triage: TriageService,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::openai(&config);

        Self::with_llm(config, llm)
    }

    /// Create a runtime around an existing LLM client.
    pub fn with_llm(config: Config, llm: LlmClient) -> Self {
        let triage = TriageService::new(llm.clone());

        Self { config, llm, triage }
    }

    /// Run on the process's stdin / stdout.
    pub async fn start(&self, mode: RunMode) -> Void {
        let mut output = stdout();

        match mode {
            RunMode::Interactive => run_console(&self.triage, &banner(&self.config), BufReader::new(stdin()), &mut output).await,
            RunMode::Once { incident, stream: true } => stream_incident(&self.triage, &incident, &mut output).await,
            RunMode::Once { incident, stream: false } => triage_incident(&self.triage, &incident, &mut output).await,
        }
    }
}
