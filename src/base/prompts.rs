//! Prompt templates for triage requests.

/// Shared rules that prefix both system directives.
const TRIAGE_RULES: &str = r#####"
You are an Incident Triage Agent for real production operations.

Your job is to produce practical, safe, and concise incident triage guidance.

Non-negotiable rules:
1. Never invent observability data, logs, or metrics that were not provided.
2. If key information is missing, list it explicitly under missing data.
3. Prioritize immediate risk reduction and customer impact containment.
4. Keep actions executable by an on-call engineer.
5. Use severity levels P1, P2, P3, or P4 only.

Domain choices:
- API
- Database
- Queue
- Networking
- Compute
- Storage
- Identity
- ThirdPartyDependency
- Unknown
"#####;

/// Output format for structured (JSON) triage.
const STRUCTURED_FORMAT: &str = r#####"
Return ONLY valid JSON with this exact shape:
{
  "incidentSummary": "string",
  "severity": "P1|P2|P3|P4",
  "primaryDomain": "API|Database|Queue|Networking|Compute|Storage|Identity|ThirdPartyDependency|Unknown",
  "customerImpact": "string",
  "topLikelyCauses": ["string", "string", "string"],
  "immediateActions15Minutes": ["string", "string", "string"],
  "stabilizationActions60Minutes": ["string", "string", "string"],
  "escalationTargets": ["string", "string"],
  "stakeholderUpdateDraft": "string",
  "missingCriticalData": ["string"]
}
"#####;

/// Output format for free-text triage.
const TEXT_FORMAT: &str = r#####"
Return concise Markdown.
"#####;

/// A realistic incident for trying the assistant out.
pub const SAMPLE_INCIDENT: &str = "Checkout API p95 latency jumped from 220ms to 4.8s after deploy 2026.02.20. \
Error rate is 18% on POST /checkout. CPU is normal, but DB connections are at 98% saturation. \
US-East customers report payment timeouts.";

/// System directive asking for a JSON triage report.
pub fn structured_system_directive() -> String {
    format!("{}{}", TRIAGE_RULES.trim_start(), STRUCTURED_FORMAT)
}

/// System directive asking for a Markdown triage write-up.
pub fn text_system_directive() -> String {
    format!("{}{}", TRIAGE_RULES.trim_start(), TEXT_FORMAT)
}

/// Wrap the raw incident description in the triage request sent as the user message.
pub fn build_incident_prompt(incident: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyze this production incident and provide triage output.\n");
    prompt.push_str("Use only the information supplied.\n\n");
    prompt.push_str("Incident details:\n");
    prompt.push_str(incident.trim());
    prompt.push_str("\n\n");
    prompt.push_str("Expectations:\n");
    prompt.push_str("- Classify severity as P1/P2/P3/P4.\n");
    prompt.push_str("- Identify the most likely technical domain.\n");
    prompt.push_str("- Provide 3 immediate 15-minute actions and 3 stabilization actions for the next hour.\n");
    prompt.push_str("- Draft one stakeholder update message.\n");
    prompt.push_str("- List missing critical data if confidence is low.\n");

    prompt
}
