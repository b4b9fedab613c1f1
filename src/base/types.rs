//! Shared result aliases, classification enums, report records and chat messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type used across the application.
pub type Err = anyhow::Error;
/// Result alias over [`Err`].
pub type Res<T> = Result<T, Err>;
/// Result alias for operations that return nothing on success.
pub type Void = Res<()>;

// Classification enums.

/// Incident severity, from most (`P1`) to least (`P4`) urgent.
///
/// The derived ordering follows urgency: `P1 < P2 < P3 < P4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Critical, customer-facing, act now.
    P1,
    /// High impact, degraded service.
    P2,
    /// Moderate impact, no urgent customer harm.
    P3,
    /// Low impact, track as a non-urgent task.
    P4,
}

impl Severity {
    /// Normalize a raw severity label (trimmed, case-insensitive).
    ///
    /// Returns `None` unless the label is exactly one of `P1`..`P4`.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            "P4" => Some(Self::P4),
            _ => None,
        }
    }

    /// The canonical label for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The technical domain an incident most likely belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// HTTP APIs and endpoints.
    #[serde(rename = "API")]
    Api,
    /// Databases and connection pools.
    Database,
    /// Queues, streams and consumers.
    Queue,
    /// DNS, routing and transport.
    Networking,
    /// Nodes, pods and instances.
    Compute,
    /// Disks, caches and object stores.
    Storage,
    /// Authentication and identity providers.
    Identity,
    /// Upstream vendors and providers.
    ThirdPartyDependency,
    /// Nothing matched.
    Unknown,
}

impl Domain {
    /// Every allowed domain, in declaration order.
    pub const ALL: [Domain; 9] = [
        Domain::Api,
        Domain::Database,
        Domain::Queue,
        Domain::Networking,
        Domain::Compute,
        Domain::Storage,
        Domain::Identity,
        Domain::ThirdPartyDependency,
        Domain::Unknown,
    ];

    /// The exact label the model is asked to answer with.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Database => "Database",
            Self::Queue => "Queue",
            Self::Networking => "Networking",
            Self::Compute => "Compute",
            Self::Storage => "Storage",
            Self::Identity => "Identity",
            Self::ThirdPartyDependency => "ThirdPartyDependency",
            Self::Unknown => "Unknown",
        }
    }

    /// Look up a domain by its exact (case-sensitive) label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.label() == label)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Reports.

/// A triage report as proposed by the model, before policy enforcement.
///
/// `severity` and `primary_domain` hold whatever the model answered, which may be
/// outside the allowed vocabularies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateReport {
    /// Short summary of the incident.
    pub incident_summary: String,
    /// Model-proposed severity label.
    pub severity: String,
    /// Model-proposed domain label.
    pub primary_domain: String,
    /// Description of the customer impact.
    pub customer_impact: String,
    /// Most likely causes, best first.
    pub top_likely_causes: Vec<String>,
    /// Actions for the first 15 minutes.
    pub immediate_actions_15_minutes: Vec<String>,
    /// Actions for the next 60 minutes.
    pub stabilization_actions_60_minutes: Vec<String>,
    /// Teams or people to escalate to.
    pub escalation_targets: Vec<String>,
    /// Draft status update for stakeholders.
    pub stakeholder_update_draft: String,
    /// Data the model wished it had.
    pub missing_critical_data: Vec<String>,
}

/// The final triage report, with severity and domain constrained to their enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTriageReport {
    /// Short summary of the incident.
    pub incident_summary: String,
    /// Policy-derived severity.
    pub severity: Severity,
    /// Policy-derived domain.
    pub primary_domain: Domain,
    /// Description of the customer impact.
    pub customer_impact: String,
    /// Most likely causes, best first.
    pub top_likely_causes: Vec<String>,
    /// Actions for the first 15 minutes.
    pub immediate_actions_15_minutes: Vec<String>,
    /// Actions for the next 60 minutes.
    pub stabilization_actions_60_minutes: Vec<String>,
    /// Teams or people to escalate to.
    pub escalation_targets: Vec<String>,
    /// Draft status update for stakeholders.
    pub stakeholder_update_draft: String,
    /// Data the model wished it had.
    pub missing_critical_data: Vec<String>,
}

impl IncidentTriageReport {
    /// Build a final report from a candidate, replacing only severity and domain.
    ///
    /// Every other field is cloned, so the result owns its data independently of `candidate`.
    pub fn from_candidate(candidate: &CandidateReport, severity: Severity, primary_domain: Domain) -> Self {
        Self {
            incident_summary: candidate.incident_summary.clone(),
            severity,
            primary_domain,
            customer_impact: candidate.customer_impact.clone(),
            top_likely_causes: candidate.top_likely_causes.clone(),
            immediate_actions_15_minutes: candidate.immediate_actions_15_minutes.clone(),
            stabilization_actions_60_minutes: candidate.stabilization_actions_60_minutes.clone(),
            escalation_targets: candidate.escalation_targets.clone(),
            stakeholder_update_draft: candidate.stakeholder_update_draft.clone(),
            missing_critical_data: candidate.missing_critical_data.clone(),
        }
    }
}

// Chat messages.

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
    /// The on-call engineer.
    User,
    /// The model itself.
    Assistant,
}

/// A single message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: ChatRole,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

// Tests.
