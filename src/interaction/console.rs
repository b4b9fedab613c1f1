//! Interactive console: read incidents line by line and print triage results.

use std::future::{Future, pending};

use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, instrument, warn};

use crate::{
    base::{cancellation::CancellationToken, config::Config, prompts::{SAMPLE_INCIDENT, build_incident_prompt}, types::Void},
    service::triage::{TriageOutcome, TriageService},
};

use super::render::render_report;

/// A single line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input.
    Skip,
    /// `/exit`
    Exit,
    /// `/sample`
    Sample,
    /// `/stream <incident>`
    Stream(String),
    /// Anything else is an incident description.
    Triage(String),
}

impl Command {
    /// Parse a console line. Commands are case-insensitive.
    pub fn parse(raw: &str) -> Self {
        let line = raw.trim();

        if line.is_empty() {
            return Self::Skip;
        }

        if line.eq_ignore_ascii_case("/exit") {
            return Self::Exit;
        }

        if line.eq_ignore_ascii_case("/sample") {
            return Self::Sample;
        }

        // Trailing whitespace still counts as the separator, so `/stream   ` streams an empty incident.
        let head = raw.trim_start();

        match head.get(..8) {
            Some(prefix) if prefix.eq_ignore_ascii_case("/stream ") => Self::Stream(head[8..].trim().to_string()),
            _ => Self::Triage(line.to_string()),
        }
    }
}

/// The greeting printed when the console starts.
pub fn banner(config: &Config) -> String {
    format!(
        "=== Incident Triage Assistant ===\nProvider: {} | Model: {}\nEndpoint: {}\nCommands: /stream <incident>, /sample, /exit\n\n",
        config.provider, config.model_id, config.base_url
    )
}

/// Resolves on the next Ctrl-C.
///
/// Never resolves if the signal handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {err}");
        pending::<()>().await;
    }
}

/// Run the read-triage-print loop until `/exit`, end of input, or Ctrl-C at the prompt.
pub async fn run_console<R, W>(triage: &TriageService, banner: &str, input: R, output: &mut W) -> Void
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    run_console_with_interrupt(triage, banner, input, output, ctrl_c).await
}

/// Like [`run_console`], with `interrupt` standing in for Ctrl-C.
///
/// An interrupt at the prompt ends the loop; during a request it abandons the request
/// and returns to the prompt.
#[instrument(skip_all)]
pub async fn run_console_with_interrupt<R, W, I, F>(triage: &TriageService, banner: &str, input: R, output: &mut W, interrupt: I) -> Void
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    output.write_all(banner.as_bytes()).await?;

    let mut lines = input.lines();

    loop {
        output.write_all(b"Incident> ").await?;
        output.flush().await?;

        let line = tokio::select! {
            biased;
            line = lines.next_line() => line?,
            _ = interrupt() => {
                info!("Interrupted at the prompt.");
                output.write_all(b"\n").await?;
                break;
            }
        };

        let Some(line) = line else {
            break;
        };

        let result = match Command::parse(&line) {
            Command::Skip => continue,
            Command::Exit => break,
            Command::Sample => output.write_all(format!("{SAMPLE_INCIDENT}\n\n").as_bytes()).await.map_err(Into::into),
            Command::Stream(incident) => stream_incident_with_interrupt(triage, &incident, output, &interrupt).await,
            Command::Triage(incident) => {
                let finished = tokio::select! {
                    biased;
                    result = triage_incident(triage, &incident, output) => Some(result),
                    _ = interrupt() => None,
                };

                match finished {
                    Some(result) => result,
                    None => {
                        warn!("Triage request cancelled by user.");
                        output.write_all(b"\n[Request cancelled]\n\n").await.map_err(Into::into)
                    }
                }
            }
        };

        if let Err(err) = result {
            error!("Triage request failed: {err}");
            output.write_all(format!("[Request failed: {err}]\n\n").as_bytes()).await?;
        }
    }

    output.flush().await?;

    Ok(())
}

/// Triage one incident, printing the report or the text fallback.
#[instrument(skip_all)]
pub async fn triage_incident<W>(triage: &TriageService, incident: &str, output: &mut W) -> Void
where
    W: AsyncWrite + Unpin,
{
    let cancel = CancellationToken::new();

    let rendered = match triage.triage_or_fallback(incident, &cancel).await? {
        TriageOutcome::Report(report) => render_report(&report),
        TriageOutcome::Text(text) => format!("[Structured mode failed on this model. Falling back to text mode.]\n\n{text}\n"),
    };

    output.write_all(rendered.as_bytes()).await?;
    output.write_all(b"\n").await?;

    Ok(())
}

/// Stream a Markdown triage response; Ctrl-C stops the stream early.
pub async fn stream_incident<W>(triage: &TriageService, incident: &str, output: &mut W) -> Void
where
    W: AsyncWrite + Unpin,
{
    stream_incident_with_interrupt(triage, incident, output, &ctrl_c).await
}

/// Like [`stream_incident`], with `interrupt` standing in for Ctrl-C.
#[instrument(skip_all)]
pub async fn stream_incident_with_interrupt<W, I, F>(triage: &TriageService, incident: &str, output: &mut W, interrupt: &I) -> Void
where
    W: AsyncWrite + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let cancel = CancellationToken::new();
    let prompt = build_incident_prompt(incident);

    output.write_all(b"\n[Streaming triage response]\n").await?;

    let mut stream = triage.run_streaming_text(&prompt, &cancel).await?;

    loop {
        tokio::select! {
            biased;
            fragment = stream.next() => match fragment {
                Some(fragment) => {
                    output.write_all(fragment?.as_bytes()).await?;
                    output.flush().await?;
                }
                None => break,
            },
            _ = interrupt() => {
                cancel.cancel();
                warn!("Streaming cancelled by user.");
                break;
            }
        }
    }

    output.write_all(b"\n\n").await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use futures::stream;

    use super::*;
    use crate::{
        base::{
            config::ConfigInner,
            types::{ChatMessage, Res},
        },
        service::llm::{FragmentStream, GenericLlmClient, LlmClient},
    };

    /// A model that never answers, and streams one fragment before stalling.
    struct StalledLlm;

    #[async_trait]
    impl GenericLlmClient for StalledLlm {
        async fn chat(&self, _messages: &[ChatMessage], _cancel: &CancellationToken) -> Res<String> {
            pending().await
        }

        async fn chat_stream(&self, _messages: &[ChatMessage], _cancel: &CancellationToken) -> Res<FragmentStream> {
            Ok(stream::iter(vec![Ok("partial".to_string())]).chain(stream::pending()).boxed())
        }
    }

    fn stalled_service() -> TriageService {
        TriageService::new(LlmClient::new(Arc::new(StalledLlm)))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), Command::Skip);
        assert_eq!(Command::parse("/EXIT"), Command::Exit);
        assert_eq!(Command::parse("/sample\n"), Command::Sample);
        assert_eq!(Command::parse("/Stream db is down"), Command::Stream("db is down".to_string()));
        assert_eq!(Command::parse("  api is slow "), Command::Triage("api is slow".to_string()));
    }

    #[test]
    fn test_parse_stream_with_trailing_space_streams_empty_incident() {
        assert_eq!(Command::parse("/stream   "), Command::Stream(String::new()));
        assert_eq!(Command::parse("  /STREAM \t"), Command::Stream(String::new()));
    }

    #[test]
    fn test_parse_stream_without_space_is_an_incident() {
        assert_eq!(Command::parse("/streaming"), Command::Triage("/streaming".to_string()));
    }

    #[test]
    fn test_parse_handles_multibyte_input() {
        assert_eq!(Command::parse("ééééé"), Command::Triage("ééééé".to_string()));
    }

    #[test]
    fn test_banner_mentions_model_and_endpoint() {
        let config = Config::from(ConfigInner::default());
        let banner = banner(&config);

        assert!(banner.contains("Model: mistral:7b"));
        assert!(banner.contains("Endpoint: http://localhost:11434/v1"));
    }

    #[tokio::test]
    async fn test_interrupt_at_prompt_ends_the_console() {
        // The writer half stays open, so the prompt would wait for input forever.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut output = Vec::new();

        let service = stalled_service();
        let session = run_console_with_interrupt(&service, "", tokio::io::BufReader::new(reader), &mut output, || async {});
        tokio::time::timeout(Duration::from_secs(5), session).await.unwrap().unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Incident> \n");
    }

    #[tokio::test]
    async fn test_interrupt_during_request_returns_to_prompt() {
        let mut output = Vec::new();

        let service = stalled_service();
        let session = run_console_with_interrupt(&service, "", "api is down\n/exit\n".as_bytes(), &mut output, || async {});
        tokio::time::timeout(Duration::from_secs(5), session).await.unwrap().unwrap();

        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("[Request cancelled]"));
        assert!(output.ends_with("Incident> "));
    }

    #[tokio::test]
    async fn test_interrupt_stops_a_stalled_stream() {
        let mut output = Vec::new();

        let service = stalled_service();
        let session = run_console_with_interrupt(&service, "", "/stream db is down\n/exit\n".as_bytes(), &mut output, || async {});
        tokio::time::timeout(Duration::from_secs(5), session).await.unwrap().unwrap();

        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("[Streaming triage response]\npartial\n\n"));
        assert!(output.ends_with("Incident> "));
    }
}
