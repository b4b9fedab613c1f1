//! Keyword and numeric signal extraction over a lowercase incident corpus.

use std::sync::LazyLock;

use regex::Regex;

/// A 1-3 digit percentage, e.g. `18%` or `98 %`.
static PERCENT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b(\d{1,3})\s*%").ok());

/// A 2-6 digit millisecond reading, e.g. `220ms` or `4200 ms`.
static LATENCY_MS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b(\d{2,6})\s*ms\b").ok());

/// Characters inspected before a percentage token.
const WINDOW_BEFORE: usize = 80;
/// Total characters inspected, starting from the window start.
const WINDOW_SPAN: usize = 160;

const NO_CUSTOMER_IMPACT: &[&str] = &["no customer impact", "customer-facing apis are unaffected"];
const WORKAROUND: &[&str] = &["workaround exists", "temporary workaround"];
const INTERNAL_ONLY: &[&str] = &["internal dashboard", "internal"];
const ALL_REGIONS: &[&str] = &["all regions", "global"];
const HIGH_IMPACT: &[&str] = &["timeouts", "outage", "unavailable", "payment timeouts"];

/// Keywords that make a nearby percentage count as an error rate.
pub const ERROR_RATE_KEYWORDS: &[&str] = &["error rate", "fail", "failure"];
/// Keywords that make a nearby percentage count as database saturation.
pub const DB_SATURATION_KEYWORDS: &[&str] = &["db connections", "saturated", "saturation"];

/// Evidence pulled out of an incident corpus.
///
/// Numeric signals are `None` when nothing matched, which sits below every threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidentSignals {
    pub no_customer_impact: bool,
    pub workaround: bool,
    pub internal_only: bool,
    pub all_regions: bool,
    pub high_impact: bool,
    pub queue_crisis: bool,
    pub error_rate: Option<u32>,
    pub db_saturation: Option<u32>,
    pub latency_ms: Option<u32>,
}

impl IncidentSignals {
    /// Scan a lowercase corpus for every signal the severity rules use.
    pub fn scan(corpus: &str) -> Self {
        Self {
            no_customer_impact: contains_any(corpus, NO_CUSTOMER_IMPACT),
            workaround: contains_any(corpus, WORKAROUND),
            internal_only: contains_any(corpus, INTERNAL_ONLY),
            all_regions: contains_any(corpus, ALL_REGIONS),
            high_impact: contains_any(corpus, HIGH_IMPACT),
            queue_crisis: corpus.contains("queue depth") && corpus.contains("consumer lag keeps increasing"),
            error_rate: percent_near_keywords(corpus, ERROR_RATE_KEYWORDS),
            db_saturation: percent_near_keywords(corpus, DB_SATURATION_KEYWORDS),
            latency_ms: largest_latency_ms(corpus),
        }
    }
}

/// Whether `text` contains any of `needles` (ordinal, case-sensitive).
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// The largest percentage whose surrounding window mentions one of `keywords`.
///
/// The window starts 80 characters before the token (clamped to the start of the text) and
/// spans at most 160 characters from there.
pub fn percent_near_keywords(corpus: &str, keywords: &[&str]) -> Option<u32> {
    let pattern = PERCENT_PATTERN.as_ref()?;

    pattern
        .captures_iter(corpus)
        .filter_map(|captures| {
            let token = captures.get(0)?;
            let value = captures.get(1)?.as_str().parse::<u32>().ok()?;
            let window = keyword_window(corpus, token.start());

            contains_any(window, keywords).then_some(value)
        })
        .max()
}

/// The largest 2-6 digit integer immediately followed by `ms` (e.g. `4200ms`, `950 ms`).
pub fn largest_latency_ms(corpus: &str) -> Option<u32> {
    let pattern = LATENCY_MS_PATTERN.as_ref()?;

    pattern.captures_iter(corpus).filter_map(|captures| captures.get(1)?.as_str().parse::<u32>().ok()).max()
}

/// The text window inspected around a token starting at byte offset `at`.
fn keyword_window(text: &str, at: usize) -> &str {
    let start = text[..at].char_indices().rev().nth(WINDOW_BEFORE - 1).map_or(0, |(index, _)| index);
    let end = text[start..].char_indices().nth(WINDOW_SPAN).map_or(text.len(), |(index, _)| start + index);

    &text[start..end]
}
