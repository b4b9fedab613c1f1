//! Deterministic override of the model's severity and domain.
//!
//! The model's classification is only trusted when no rule grounded in the incident text
//! applies. Both decisions are ordered lists evaluated top to bottom, and the first match
//! wins, so the order of [`SEVERITY_RULES`] and [`DOMAIN_RULES`] is part of the behavior.

use tracing::debug;

use crate::base::types::{CandidateReport, Domain, IncidentTriageReport, Severity};

use super::signals::{IncidentSignals, contains_any};

/// A severity rule: when `fires` holds for the scanned signals, the incident gets `severity`.
pub struct SeverityRule {
    pub name: &'static str,
    pub fires: fn(&IncidentSignals) -> bool,
    pub severity: Severity,
}

/// Severity rules in precedence order.
pub static SEVERITY_RULES: [SeverityRule; 6] = [
    SeverityRule {
        name: "no_customer_impact_with_workaround",
        fires: no_customer_impact_with_workaround,
        severity: Severity::P4,
    },
    SeverityRule {
        name: "internal_only_without_customer_impact",
        fires: internal_only_without_customer_impact,
        severity: Severity::P4,
    },
    SeverityRule {
        name: "all_regions_high_impact",
        fires: all_regions_high_impact,
        severity: Severity::P1,
    },
    SeverityRule {
        name: "critical_thresholds",
        fires: critical_thresholds,
        severity: Severity::P1,
    },
    SeverityRule {
        name: "elevated_thresholds",
        fires: elevated_thresholds,
        severity: Severity::P2,
    },
    SeverityRule {
        name: "no_customer_impact",
        fires: no_customer_impact,
        severity: Severity::P3,
    },
];

/// Severity used when no rule fires and the model's answer is not a valid P-code.
pub const FALLBACK_SEVERITY: Severity = Severity::P3;

/// Domain keyword groups in precedence order. Anything unmatched is [`Domain::Unknown`].
pub static DOMAIN_RULES: [(Domain, &[&str]); 8] = [
    (Domain::Api, &["api", "endpoint", "http", "latency"]),
    (Domain::Database, &["database", "db", "sql", "connection pool"]),
    (Domain::Queue, &["queue", "consumer lag", "backlog", "kafka", "service bus"]),
    (Domain::Networking, &["dns", "network", "packet", "tcp", "routing"]),
    (Domain::Compute, &["cpu", "memory", "node", "pod", "instance"]),
    (Domain::Storage, &["disk", "storage", "filesystem", "cache", "volume", "blob", "s3"]),
    (Domain::Identity, &["identity", "auth", "sso", "oauth", "login"]),
    (Domain::ThirdPartyDependency, &["upstream", "provider", "third-party", "third party", "vendor"]),
];

// Rule predicates.

fn at_least(value: Option<u32>, threshold: u32) -> bool {
    value.is_some_and(|value| value >= threshold)
}

fn no_customer_impact_with_workaround(signals: &IncidentSignals) -> bool {
    signals.no_customer_impact && signals.workaround
}

fn internal_only_without_customer_impact(signals: &IncidentSignals) -> bool {
    signals.internal_only && signals.no_customer_impact
}

fn all_regions_high_impact(signals: &IncidentSignals) -> bool {
    signals.all_regions && (at_least(signals.error_rate, 20) || signals.high_impact)
}

fn critical_thresholds(signals: &IncidentSignals) -> bool {
    signals.queue_crisis || at_least(signals.error_rate, 15) || at_least(signals.db_saturation, 95) || at_least(signals.latency_ms, 4000)
}

fn elevated_thresholds(signals: &IncidentSignals) -> bool {
    at_least(signals.error_rate, 5) || at_least(signals.db_saturation, 85) || at_least(signals.latency_ms, 1000) || signals.high_impact
}

fn no_customer_impact(signals: &IncidentSignals) -> bool {
    signals.no_customer_impact
}

// Enforcement.

/// Produce the final report: severity and domain re-derived, everything else copied.
///
/// This never fails and never touches `candidate`.
pub fn apply(incident: &str, candidate: &CandidateReport) -> IncidentTriageReport {
    let corpus = build_corpus(incident, candidate);
    let signals = IncidentSignals::scan(&corpus);

    let severity = determine_severity(&signals, &candidate.severity);
    let primary_domain = normalize_domain(&candidate.primary_domain, &corpus);

    debug!("Policy resolved severity {} -> {severity}, domain {} -> {primary_domain}.", candidate.severity, candidate.primary_domain);

    IncidentTriageReport::from_candidate(candidate, severity, primary_domain)
}

/// The lowercase text every rule matches against.
pub fn build_corpus(incident: &str, candidate: &CandidateReport) -> String {
    format!("{incident} {} {}", candidate.incident_summary, candidate.customer_impact).to_lowercase()
}

/// Walk the severity rules; fall back to the model's answer, then to P3.
pub fn determine_severity(signals: &IncidentSignals, proposed: &str) -> Severity {
    if let Some(rule) = SEVERITY_RULES.iter().find(|rule| (rule.fires)(signals)) {
        debug!("Severity rule `{}` fired.", rule.name);
        return rule.severity;
    }

    match Severity::normalize(proposed) {
        Some(severity) => severity,
        None => {
            debug!("No severity rule fired and `{proposed}` is not a valid severity.");
            FALLBACK_SEVERITY
        }
    }
}

/// Keep an allowed domain as-is; otherwise classify by the first matching keyword group.
pub fn normalize_domain(proposed: &str, corpus: &str) -> Domain {
    if let Some(domain) = Domain::from_label(proposed) {
        return domain;
    }

    DOMAIN_RULES
        .iter()
        .find(|(_, keywords)| contains_any(corpus, keywords))
        .map_or(Domain::Unknown, |(domain, _)| *domain)
}
