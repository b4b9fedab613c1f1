//! Extraction of a structured report from a raw model response.
//!
//! Models tend to wrap their JSON in narration ("Sure! Here is the report: ..."), so the
//! payload is located by taking everything from the first `{` to the last `}`. There is no
//! brace-depth tracking: a response containing two separate objects, or prose braces after
//! the object, produces a payload that fails to parse. Nested object values inside the report
//! are not supported either.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::base::types::CandidateReport;

/// The serialized field names of [`CandidateReport`].
const REPORT_FIELDS: [&str; 10] = [
    "incidentSummary",
    "severity",
    "primaryDomain",
    "customerImpact",
    "topLikelyCauses",
    "immediateActions15Minutes",
    "stabilizationActions60Minutes",
    "escalationTargets",
    "stakeholderUpdateDraft",
    "missingCriticalData",
];

/// Reasons a model response could not be turned into a report.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No `{`, or no `}` after the first `{`.
    #[error("Structured response did not contain a valid JSON object.")]
    MalformedPayload,
    /// The payload parsed, but not into a record.
    #[error("Model returned an empty structured response.")]
    EmptyResult,
    /// The payload between the braces is not valid JSON for the report schema.
    #[error("Structured response is not valid report JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Extract a candidate report from a raw model response.
pub fn extract_report(response: &str) -> Result<CandidateReport, ExtractionError> {
    let payload = locate_payload(response)?;

    debug!("Located {} byte payload in {} byte response.", payload.len(), response.len());

    parse_report_payload(payload)
}

/// Slice the text from the first `{` through the last `}` (inclusive).
pub fn locate_payload(text: &str) -> Result<&str, ExtractionError> {
    let start = text.find('{').ok_or(ExtractionError::MalformedPayload)?;
    let end = text.rfind('}').filter(|end| *end > start).ok_or(ExtractionError::MalformedPayload)?;

    Ok(&text[start..=end])
}

/// Parse a JSON payload into a report, binding field names regardless of casing convention.
///
/// Unknown fields are ignored, and missing or `null` fields take their defaults. If a field
/// appears more than once under different spellings, the last one wins.
pub fn parse_report_payload(payload: &str) -> Result<CandidateReport, ExtractionError> {
    let Value::Object(fields) = serde_json::from_str::<Value>(payload)? else {
        return Err(ExtractionError::EmptyResult);
    };

    let mut known = Map::new();

    for (key, value) in fields {
        let Some(name) = canonical_field(&key) else {
            debug!("Ignoring unknown report field `{key}`.");
            continue;
        };

        if value.is_null() {
            known.remove(name);
        } else {
            known.insert(name.to_string(), value);
        }
    }

    Ok(serde_json::from_value(Value::Object(known))?)
}

/// Map a key onto its report field name, ignoring case, `_`, `-` and spaces.
fn canonical_field(key: &str) -> Option<&'static str> {
    let folded = fold_key(key);
    REPORT_FIELDS.into_iter().find(|field| fold_key(field) == folded)
}

fn fold_key(key: &str) -> String {
    key.chars().filter(|c| !matches!(c, '_' | '-' | ' ')).flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_report() -> CandidateReport {
        CandidateReport {
            incident_summary: "Checkout latency spike".to_string(),
            severity: "P2".to_string(),
            primary_domain: "API".to_string(),
            customer_impact: "Some checkouts fail".to_string(),
            top_likely_causes: vec!["Bad deploy".to_string(), "Pool exhaustion".to_string()],
            immediate_actions_15_minutes: vec!["Roll back".to_string()],
            stabilization_actions_60_minutes: vec!["Add capacity".to_string()],
            escalation_targets: vec!["Payments on-call".to_string()],
            stakeholder_update_draft: "We are investigating {elevated} errors.".to_string(),
            missing_critical_data: vec!["Deploy diff".to_string()],
        }
    }

    #[test]
    fn test_extract_tolerates_surrounding_prose() {
        let report = full_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let response = format!("Sure! Here is the triage report you asked for:\n\n{json}\n\nLet me know if you need more.");

        assert_eq!(extract_report(&response).unwrap(), report);
    }

    #[test]
    fn test_extract_without_open_brace_is_malformed() {
        let result = extract_report("I could not produce a report.");

        assert!(matches!(result, Err(ExtractionError::MalformedPayload)));
    }

    #[test]
    fn test_extract_with_close_before_open_is_malformed() {
        assert!(matches!(extract_report("} nothing here {"), Err(ExtractionError::MalformedPayload)));
        assert!(matches!(extract_report("only an opener {"), Err(ExtractionError::MalformedPayload)));
    }

    #[test]
    fn test_empty_object_yields_default_report() {
        let report = extract_report("{}").unwrap();

        assert_eq!(report, CandidateReport::default());
    }

    #[test]
    fn test_null_payload_is_empty_result() {
        assert!(matches!(parse_report_payload("null"), Err(ExtractionError::EmptyResult)));
        assert!(matches!(parse_report_payload("[]"), Err(ExtractionError::EmptyResult)));
    }

    #[test]
    fn test_field_names_bind_across_casing_conventions() {
        let response = r#"{
            "IncidentSummary": "db down",
            "SEVERITY": "p1",
            "primary_domain": "Database",
            "Top-Likely-Causes": ["disk full"],
            "immediateactions15minutes": ["fail over"],
            "unrelated": {"nested": true}
        }"#;

        let report = extract_report(response).unwrap();

        assert_eq!(report.incident_summary, "db down");
        assert_eq!(report.severity, "p1");
        assert_eq!(report.primary_domain, "Database");
        assert_eq!(report.top_likely_causes, vec!["disk full".to_string()]);
        assert_eq!(report.immediate_actions_15_minutes, vec!["fail over".to_string()]);
        assert!(report.escalation_targets.is_empty());
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let report = extract_report(r#"{"severity": null, "escalationTargets": null, "customerImpact": "none"}"#).unwrap();

        assert_eq!(report.severity, "");
        assert!(report.escalation_targets.is_empty());
        assert_eq!(report.customer_impact, "none");
    }

    #[test]
    fn test_last_spelling_of_a_field_wins() {
        let report = extract_report(r#"{"severity": "P1", "Severity": "P3"}"#).unwrap();

        assert_eq!(report.severity, "P3");
    }

    #[test]
    fn test_wrong_field_type_is_invalid_json() {
        let result = extract_report(r#"{"severity": 1}"#);

        assert!(matches!(result, Err(ExtractionError::InvalidJson(_))));
    }

    #[test]
    fn test_trailing_prose_brace_breaks_extraction() {
        // The last `}` belongs to the narration, so the payload is not valid JSON.
        let result = extract_report(r#"{"severity": "P2"} and also {see above}"#);

        assert!(matches!(result, Err(ExtractionError::InvalidJson(_))));
    }
}
