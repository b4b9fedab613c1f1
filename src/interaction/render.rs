//! Plain-text rendering of triage results.

use crate::base::types::{IncidentTriageReport, Severity};

/// Acknowledgment guidance for a severity label.
///
/// The label is normalized first, so `" p1 "` maps like `"P1"`.
pub fn sla_hint(severity: &str) -> &'static str {
    match Severity::normalize(severity) {
        Some(Severity::P1) => "Acknowledge within 5 minutes; page primary + secondary on-call immediately.",
        Some(Severity::P2) => "Acknowledge within 15 minutes; engage on-call owner and incident commander.",
        Some(Severity::P3) => "Acknowledge within 30 minutes; queue remediation in active sprint.",
        Some(Severity::P4) => "Acknowledge within business hours; track as non-urgent reliability task.",
        None => "Unknown severity. Validate with incident commander.",
    }
}

/// Render a report as titled sections, followed by its SLA hint.
pub fn render_report(report: &IncidentTriageReport) -> String {
    let mut out = String::from("=== Triage Report ===\n");

    out.push_str(&format!("Summary: {}\n", report.incident_summary));
    out.push_str(&format!("Severity: {}\n", report.severity));
    out.push_str(&format!("Domain: {}\n", report.primary_domain));
    out.push_str(&format!("Customer Impact: {}\n", report.customer_impact));

    out.push_str(&render_list("Top Likely Causes", &report.top_likely_causes));
    out.push_str(&render_list("Immediate Actions (Next 15 Minutes)", &report.immediate_actions_15_minutes));
    out.push_str(&render_list("Stabilization Actions (Next 60 Minutes)", &report.stabilization_actions_60_minutes));
    out.push_str(&render_list("Escalation Targets", &report.escalation_targets));

    out.push_str(&format!("Stakeholder Update Draft:\n{}\n", report.stakeholder_update_draft));

    out.push_str(&render_list("Missing Critical Data", &report.missing_critical_data));

    out.push_str(&format!("\nSLA Hint: {}\n", sla_hint(report.severity.as_str())));

    out
}

fn render_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{title}:\n- None\n");
    }

    let lines: String = items.iter().map(|item| format!("- {item}\n")).collect();

    format!("{title}:\n{lines}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::Domain;

    fn report() -> IncidentTriageReport {
        IncidentTriageReport {
            incident_summary: "Checkout errors".to_string(),
            severity: Severity::P1,
            primary_domain: Domain::Api,
            customer_impact: "Payments failing".to_string(),
            top_likely_causes: vec!["Bad deploy".to_string(), "DB pool exhaustion".to_string()],
            immediate_actions_15_minutes: vec!["Roll back".to_string()],
            stabilization_actions_60_minutes: vec![],
            escalation_targets: vec!["Payments on-call".to_string()],
            stakeholder_update_draft: "We are investigating checkout errors.".to_string(),
            missing_critical_data: vec![],
        }
    }

    #[test]
    fn test_sla_hint_lookup() {
        assert!(sla_hint("P1").contains("5 minutes"));
        assert!(sla_hint(" p2").contains("15 minutes"));
        assert!(sla_hint("P3").contains("30 minutes"));
        assert!(sla_hint("P4").contains("business hours"));
        assert!(sla_hint("SEV0").starts_with("Unknown severity"));
    }

    #[test]
    fn test_render_report_sections() {
        let rendered = render_report(&report());

        assert!(rendered.starts_with("=== Triage Report ===\n"));
        assert!(rendered.contains("Severity: P1\n"));
        assert!(rendered.contains("Domain: API\n"));
        assert!(rendered.contains("Top Likely Causes:\n- Bad deploy\n- DB pool exhaustion\n"));
        assert!(rendered.contains("Stabilization Actions (Next 60 Minutes):\n- None\n"));
        assert!(rendered.contains("Stakeholder Update Draft:\nWe are investigating checkout errors.\nMissing Critical Data:\n- None\n\nSLA Hint"));
        assert!(rendered.ends_with("SLA Hint: Acknowledge within 5 minutes; page primary + secondary on-call immediately.\n"));
    }
}
