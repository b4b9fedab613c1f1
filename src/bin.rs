//! Binary entry point for `incident-triage`.
//!
//! This module provides the command-line interface for incident-triage with options
//! for configuration file paths, logging verbosity, and one-shot triage. It initializes
//! the necessary components and starts the assistant.

use clap::Parser;
use incident_triage::{
    base::{config::Config, types::Void},
    runtime::RunMode,
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Incident-triage – turn incident descriptions into grounded triage reports.
///
/// Configuration can come from `config.toml` or `INCIDENT_TRIAGE_*` environment variables.
/// Without `--incident`, the assistant starts an interactive console.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the assistant will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Triage a single incident description and exit.
    #[arg(short, long)]
    incident: Option<String>,
    /// Stream a Markdown response for `--incident` instead of a structured report.
    #[arg(short, long, requires = "incident")]
    stream: bool,
}

/// Main entry point for the incident-triage binary.
///
/// Sets up logging based on verbosity, loads configuration, and starts the assistant.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("incident-triage");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref())?;

    let mode = match args.incident {
        Some(incident) => RunMode::Once { incident, stream: args.stream },
        None => RunMode::Interactive,
    };

    incident_triage::start(config, mode).await
}
