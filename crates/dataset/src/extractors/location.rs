//! City and locality extraction from free-form addresses
//!
//! Both lookups are ranked pattern tables evaluated top to bottom; the first
//! hit wins even when a later entry would be more specific. "Navi Mumbai"
//! therefore resolves to Mumbai.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Resolved location of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub locality: Option<String>,
}

/// (canonical city, alias pattern) in priority order
static CITY_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("Mumbai", Regex::new(r"(?i)\b(?:mumbai|bombay)\b").unwrap()),
        ("Thane", Regex::new(r"(?i)\bthane\b").unwrap()),
        ("Pune", Regex::new(r"(?i)\b(?:pune|poona)\b").unwrap()),
        ("Bangalore", Regex::new(r"(?i)\b(?:bangalore|bengaluru)\b").unwrap()),
        ("Delhi", Regex::new(r"(?i)\b(?:new\s+delhi|delhi)\b").unwrap()),
        ("Gurgaon", Regex::new(r"(?i)\b(?:gurgaon|gurugram)\b").unwrap()),
        ("Noida", Regex::new(r"(?i)\bnoida\b").unwrap()),
        ("Hyderabad", Regex::new(r"(?i)\b(?:hyderabad|secunderabad)\b").unwrap()),
        ("Chennai", Regex::new(r"(?i)\b(?:chennai|madras)\b").unwrap()),
        ("Kolkata", Regex::new(r"(?i)\b(?:kolkata|calcutta)\b").unwrap()),
        ("Ahmedabad", Regex::new(r"(?i)\bahmedabad\b").unwrap()),
    ]
});

/// Every spelling a city matcher accepts, lowercase
const CITY_NAMES: &[&str] = &[
    "mumbai", "bombay", "navi mumbai", "thane", "pune", "poona", "bangalore", "bengaluru",
    "delhi", "new delhi", "gurgaon", "gurugram", "noida", "hyderabad", "secunderabad",
    "chennai", "madras", "kolkata", "calcutta", "ahmedabad",
];

const STOPWORDS: &[&str] = &[
    "the", "and", "near", "opp", "opposite", "behind", "off", "plot", "survey", "no", "sr",
    "gat", "cts", "flat", "floor", "wing", "tower", "building", "phase", "india",
    "maharashtra", "karnataka", "telangana", "tamil", "nadu", "state", "district", "dist",
    "taluka", "tal",
];

/// Locality heuristics in priority order, capture group 1 is the candidate
static LOCALITY_HEURISTICS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "landmark",
            Regex::new(r"(?i)\b(?:near|opp\.?|opposite|behind|off)\s+([^,;\n]+)").unwrap(),
        ),
        (
            "area_suffix",
            Regex::new(
                r"\b((?:[A-Z][A-Za-z]+\s+){1,2}(?:Nagar|Road|Rd|Marg|Chowk|Colony|Layout|Vihar|Enclave|Peth|Wadi|Gaon|Park|West|East|North|South))\b",
            )
            .unwrap(),
        ),
        (
            "before_city",
            Regex::new(
                r"(?i)([A-Za-z][A-Za-z .'-]*?)\s*,?\s*\b(?:navi\s+mumbai|mumbai|bombay|thane|pune|poona|bangalore|bengaluru|new\s+delhi|delhi|gurgaon|gurugram|noida|hyderabad|secunderabad|chennai|madras|kolkata|calcutta|ahmedabad)\b",
            )
            .unwrap(),
        ),
        (
            "capitalized",
            Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").unwrap(),
        ),
        (
            "after_survey_no",
            Regex::new(
                r"(?i)\b(?:survey|s\.?\s?no|sr\.?\s?no|plot|gat|cts)\.?\s*(?:no\.?)?\s*[0-9][0-9A-Za-z/-]*\s*,?\s*([A-Za-z][A-Za-z .'-]+)",
            )
            .unwrap(),
        ),
    ]
});

/// Resolve city and locality
///
/// The city is searched in the address followed by the project name. The
/// locality comes from the address only.
pub fn extract_location(full_address: &str, project_name: &str) -> Location {
    Location {
        city: extract_city(&format!("{} {}", full_address, project_name)),
        locality: extract_locality(full_address),
    }
}

/// Canonical city name of the first matcher that hits `text`
pub fn extract_city(text: &str) -> Option<String> {
    CITY_MATCHERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(city, _)| city.to_string())
}

fn extract_locality(address: &str) -> Option<String> {
    if address.trim().is_empty() {
        return None;
    }

    for (name, pattern) in LOCALITY_HEURISTICS.iter() {
        let Some(candidate) = pattern
            .captures(address)
            .and_then(|caps| caps.get(1))
            .map(|m| clean(m.as_str()))
        else {
            continue;
        };

        if is_valid_locality(&candidate) {
            tracing::trace!(heuristic = name, locality = %candidate, "Locality resolved");
            return Some(candidate);
        }
    }

    address
        .split(',')
        .map(clean)
        .find(|segment| is_valid_locality(segment))
}

fn clean(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c.is_whitespace() || ",.;:-/".contains(c))
        .trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_digit() || ",.;:-/".contains(c))
        .to_string()
}

/// A plausible locality: not a bare city, has a meaningful word
pub fn is_valid_locality(candidate: &str) -> bool {
    let candidate = candidate.trim();

    if candidate.chars().count() < 3 || !candidate.chars().any(char::is_alphabetic) {
        return false;
    }

    let lower = candidate.to_lowercase();
    if CITY_NAMES.contains(&lower.as_str()) {
        return false;
    }

    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token.chars().count() > 2 && !STOPWORDS.contains(&token))
}
