use incident_triage::{
    base::types::{CandidateReport, Domain, Severity},
    triage::{enforce_policy, extract_report, policy::normalize_domain},
};
use proptest::prelude::*;

const SNIPPETS: &[&str] = &[
    "",
    "in all regions",
    "no customer impact",
    "temporary workaround available",
    "internal tooling only",
    "p99 1200ms",
    "db connections at 90%",
    "users report timeouts",
    "queue depth rising",
];

fn proposed_severity() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["P1", "P2", "P3", "P4", "p2 ", "weird", ""]).prop_map(str::to_string)
}

fn candidate(severity: String) -> CandidateReport {
    CandidateReport {
        severity,
        primary_domain: "Unknown".to_string(),
        ..Default::default()
    }
}

fn with_case(text: &str, upper: bool) -> String {
    if upper { text.to_uppercase() } else { text.to_string() }
}

fn text_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?{}\"\\\\]{0,30}"
}

fn list_field() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text_field(), 0..4)
}

fn arbitrary_report() -> impl Strategy<Value = CandidateReport> {
    (
        text_field(),
        text_field(),
        text_field(),
        text_field(),
        list_field(),
        list_field(),
        list_field(),
        list_field(),
        text_field(),
        list_field(),
    )
        .prop_map(
            |(
                incident_summary,
                severity,
                primary_domain,
                customer_impact,
                top_likely_causes,
                immediate_actions_15_minutes,
                stabilization_actions_60_minutes,
                escalation_targets,
                stakeholder_update_draft,
                missing_critical_data,
            )| CandidateReport {
                incident_summary,
                severity,
                primary_domain,
                customer_impact,
                top_likely_causes,
                immediate_actions_15_minutes,
                stabilization_actions_60_minutes,
                escalation_targets,
                stakeholder_update_draft,
                missing_critical_data,
            },
        )
}

proptest! {
    #[test]
    fn no_impact_with_workaround_is_always_p4(
        filler in "[a-z0-9 .,%]{0,60}",
        impact_upper in any::<bool>(),
        workaround_upper in any::<bool>(),
        workaround_first in any::<bool>(),
        proposed in proposed_severity(),
    ) {
        let impact = with_case("No customer impact", impact_upper);
        let workaround = with_case("Workaround exists", workaround_upper);
        let incident = if workaround_first {
            format!("{workaround}. {filler} {impact}.")
        } else {
            format!("{impact}. {filler} {workaround}.")
        };

        prop_assert_eq!(enforce_policy(&incident, &candidate(proposed)).severity, Severity::P4);
    }

    #[test]
    fn all_regions_with_high_error_rate_is_always_p1(rate in 20u32..1000, proposed in proposed_severity()) {
        let incident = format!("Checkout degraded in all regions, error rate is {rate}% on POST /checkout.");

        prop_assert_eq!(enforce_policy(&incident, &candidate(proposed)).severity, Severity::P1);
    }

    #[test]
    fn higher_error_rate_never_lowers_severity(
        low in 0u32..1000,
        bump in 0u32..1000,
        prefix in prop::sample::select(SNIPPETS),
        suffix in prop::sample::select(SNIPPETS),
        proposed in prop::sample::select(vec!["P4", "weird", ""]),
    ) {
        let high = (low + bump).min(999);
        let incident = |rate: u32| format!("{prefix}. error rate is {rate}% on uploads. {suffix}");

        // The model's own answer is held at the least urgent option, so only the rules can escalate.
        let low_severity = enforce_policy(&incident(low), &candidate(proposed.to_string())).severity;
        let high_severity = enforce_policy(&incident(high), &candidate(proposed.to_string())).severity;

        // `P1 < P4`, so a more urgent result compares lower.
        prop_assert!(high_severity <= low_severity);
    }

    #[test]
    fn valid_domain_is_never_reclassified(index in 0usize..9, corpus in "[a-z0-9 ]{0,120}") {
        let domain = Domain::ALL[index];

        prop_assert_eq!(normalize_domain(domain.label(), &corpus), domain);
    }

    #[test]
    fn enforcement_is_pure(report in arbitrary_report(), incident in "[a-zA-Z0-9 %.]{0,120}") {
        let before = report.clone();

        let first = enforce_policy(&incident, &report);
        let second = enforce_policy(&incident, &report);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&report, &before);
        prop_assert_eq!(&first.top_likely_causes, &report.top_likely_causes);
        prop_assert_eq!(&first.stakeholder_update_draft, &report.stakeholder_update_draft);
    }

    #[test]
    fn extraction_round_trips_through_prose(
        report in arbitrary_report(),
        prefix in "[a-zA-Z .,:!\n]{0,40}",
        suffix in "[a-zA-Z .,:!\n]{0,40}",
        pretty in any::<bool>(),
    ) {
        let json = if pretty { serde_json::to_string_pretty(&report).unwrap() } else { serde_json::to_string(&report).unwrap() };
        let response = format!("{prefix}{json}{suffix}");

        prop_assert_eq!(extract_report(&response).unwrap(), report);
    }
}
