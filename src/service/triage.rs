//! Incident triage requests against the model, with policy enforcement on structured output.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        cancellation::CancellationToken,
        prompts::{build_incident_prompt, structured_system_directive, text_system_directive},
        types::{CandidateReport, ChatMessage, IncidentTriageReport, Res},
    },
    service::llm::{FragmentStream, LlmClient},
    triage::{enforce_policy, extract_report},
};

/// The result of a triage attempt that is allowed to degrade to free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    /// A structured, policy-enforced report.
    Report(IncidentTriageReport),
    /// The Markdown fallback produced when structured triage failed.
    Text(String),
}

/// Triage service for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TriageService {
    llm: LlmClient,
}

impl TriageService {
    /// Create a triage service on top of an LLM client.
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Ask for a JSON report and extract it from the response.
    #[instrument(name = "TriageService::run_structured", skip_all)]
    pub async fn run_structured(&self, prompt: &str, cancel: &CancellationToken) -> Res<CandidateReport> {
        let messages = [ChatMessage::system(structured_system_directive()), ChatMessage::user(prompt)];
        let response = self.llm.chat(&messages, cancel).await?;

        Ok(extract_report(&response)?)
    }

    /// Ask for a Markdown write-up.
    #[instrument(name = "TriageService::run_text", skip_all)]
    pub async fn run_text(&self, prompt: &str, cancel: &CancellationToken) -> Res<String> {
        let messages = [ChatMessage::system(text_system_directive()), ChatMessage::user(prompt)];

        self.llm.chat(&messages, cancel).await
    }

    /// Stream a Markdown write-up.
    #[instrument(name = "TriageService::run_streaming_text", skip_all)]
    pub async fn run_streaming_text(&self, prompt: &str, cancel: &CancellationToken) -> Res<FragmentStream> {
        let messages = [ChatMessage::system(text_system_directive()), ChatMessage::user(prompt)];

        self.llm.chat_stream(&messages, cancel).await
    }

    /// Produce a policy-enforced report for a raw incident description.
    #[instrument(name = "TriageService::triage", skip_all)]
    pub async fn triage(&self, incident: &str, cancel: &CancellationToken) -> Res<IncidentTriageReport> {
        let prompt = build_incident_prompt(incident);
        let candidate = self.run_structured(&prompt, cancel).await?;

        info!("Model proposed severity `{}` and domain `{}`.", candidate.severity, candidate.primary_domain);

        Ok(enforce_policy(incident, &candidate))
    }

    /// Like [`TriageService::triage`], but degrade to a Markdown response if structured triage fails.
    #[instrument(name = "TriageService::triage_or_fallback", skip_all)]
    pub async fn triage_or_fallback(&self, incident: &str, cancel: &CancellationToken) -> Res<TriageOutcome> {
        match self.triage(incident, cancel).await {
            Ok(report) => Ok(TriageOutcome::Report(report)),
            Err(err) => {
                warn!("Structured triage failed, falling back to text mode: {err}");

                let prompt = build_incident_prompt(incident);
                let text = self.run_text(&prompt, cancel).await?;

                Ok(TriageOutcome::Text(text))
            }
        }
    }
}
