//! Human-readable scenario labels.
//!
//! `CheckoutFeature.PaysWithSavedCard` reads as `Checkout - Pays with saved card`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[_\-\s]+").unwrap();
    static ref FEATURE_SUFFIX: Regex = Regex::new(r"(?i)_?feature$").unwrap();
}

/// Humanize one segment: drop a trailing `feature`, split words, sentence-case.
pub fn humanize(segment: &str) -> String {
    let trimmed = FEATURE_SUFFIX.replace(segment.trim(), "");
    let spaced = ACRONYM_BOUNDARY.replace_all(&trimmed, "$1 $2");
    let spaced = CAMEL_BOUNDARY.replace_all(&spaced, "$1 $2");
    let spaced = SEPARATORS.replace_all(&spaced, " ");
    sentence_case(spaced.trim())
}

fn sentence_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display label for a raw scenario name.
pub fn scenario_label(raw: &str) -> String {
    let mut segments = raw.rsplit('.');
    let method = segments.next().map(humanize).unwrap_or_default();
    let class = segments.next().map(humanize).unwrap_or_default();
    match (class.is_empty(), method.is_empty()) {
        (false, false) => format!("{class} - {method}"),
        (false, true) => class,
        (true, false) => method,
        (true, true) => raw.to_string(),
    }
}
