//! Filter Extraction from Search Queries
//!
//! Deterministic keyword and pattern scan used when no language model is
//! available. Each field is filled by the first pattern that matches, in
//! table order, over the lowercased message.
//!
//! ## Static Regex Patterns
//!
//! Patterns are compiled once using `once_cell::sync::Lazy`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use propchat_core::{FilterExtractor, Possession, PropertyFilters, Result};
use regex::Regex;

// =============================================================================
// STATIC TABLES
// =============================================================================

/// Cities recognised by name, in priority order
const CITIES: [&str; 6] = ["mumbai", "pune", "bangalore", "delhi", "hyderabad", "chennai"];

/// Localities recognised by name, in priority order
const LOCALITIES: [&str; 12] = [
    "andheri",
    "bandra",
    "powai",
    "goregaon",
    "baner",
    "wakad",
    "hinjewadi",
    "kharadi",
    "whitefield",
    "koramangala",
    "gachibowli",
    "velachery",
];

/// Budget multiplier
#[derive(Debug, Clone, Copy)]
enum BudgetUnit {
    Lakh,  // 100,000
    Crore, // 10,000,000
}

impl BudgetUnit {
    fn value(&self) -> f64 {
        match self {
            BudgetUnit::Lakh => 100_000.0,
            BudgetUnit::Crore => 10_000_000.0,
        }
    }
}

// BHK patterns (N bhk, N bedroom, N bed, N b/h/k)
static BHK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d+)\s*bhk").unwrap(),
        Regex::new(r"(\d+)\s*bedroom").unwrap(),
        Regex::new(r"(\d+)\s*bed").unwrap(),
        Regex::new(r"(\d+)\s*b/?h/?k").unwrap(),
    ]
});

// Budget patterns, bounded phrases before bare amounts
static BUDGET_PATTERNS: Lazy<Vec<(Regex, BudgetUnit)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"under\s*(\d+(?:\.\d+)?)\s*(?:crore|cr)\b").unwrap(), BudgetUnit::Crore),
        (Regex::new(r"(?:upto|up\s+to)\s*(\d+(?:\.\d+)?)\s*(?:crore|cr)\b").unwrap(), BudgetUnit::Crore),
        (Regex::new(r"below\s*(\d+(?:\.\d+)?)\s*(?:crore|cr)\b").unwrap(), BudgetUnit::Crore),
        (Regex::new(r"under\s*(\d+(?:\.\d+)?)\s*(?:lakhs?|lacs?)\b").unwrap(), BudgetUnit::Lakh),
        (Regex::new(r"(\d+(?:\.\d+)?)\s*(?:crore|cr)\b").unwrap(), BudgetUnit::Crore),
        (Regex::new(r"(\d+(?:\.\d+)?)\s*(?:lakhs?|lacs?)\b").unwrap(), BudgetUnit::Lakh),
    ]
});

// Possession phrases
static POSSESSION_PATTERNS: Lazy<Vec<(Regex, Possession)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"ready|move\s+in").unwrap(), Possession::ReadyToMove),
        (Regex::new(r"under\s+construction").unwrap(), Possession::UnderConstruction),
    ]
});

/// Rule-based filter parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterParser;

impl FilterParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a free-text query; unmatched fields stay absent
    pub fn parse(&self, message: &str) -> PropertyFilters {
        let lower = message.to_lowercase();

        let filters = PropertyFilters {
            city: self.extract_city(&lower),
            bhk: self.extract_bhk(&lower),
            max_price: self.extract_budget(&lower),
            locality: self.extract_locality(&lower),
            possession: self.extract_possession(&lower).map(|p| p.as_str().to_string()),
            amenities: None,
        };

        tracing::debug!(?filters, "Parsed filters from keywords");
        filters
    }

    /// City name, kept lowercase
    pub fn extract_city(&self, lower: &str) -> Option<String> {
        CITIES
            .iter()
            .find(|city| lower.contains(**city))
            .map(|city| city.to_string())
    }

    pub fn extract_bhk(&self, lower: &str) -> Option<u32> {
        BHK_PATTERNS.iter().find_map(|pattern| {
            pattern
                .captures(lower)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }

    /// Budget ceiling in whole rupees
    pub fn extract_budget(&self, lower: &str) -> Option<f64> {
        for (pattern, unit) in BUDGET_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(lower) {
                if let Some(amount) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                    return Some((amount * unit.value()).round());
                }
            }
        }
        None
    }

    pub fn extract_locality(&self, lower: &str) -> Option<String> {
        LOCALITIES
            .iter()
            .find(|locality| lower.contains(**locality))
            .map(|locality| locality.to_string())
    }

    pub fn extract_possession(&self, lower: &str) -> Option<Possession> {
        POSSESSION_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(lower))
            .map(|(_, possession)| *possession)
    }
}

/// [`FilterExtractor`] backed by [`FilterParser`]; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFilterExtractor {
    parser: FilterParser,
}

impl HeuristicFilterExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FilterExtractor for HeuristicFilterExtractor {
    async fn extract(&self, message: &str) -> Result<PropertyFilters> {
        Ok(self.parser.parse(message))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bhk_city_and_crore_budget() {
        let filters = FilterParser::new().parse("3BHK in Pune under 1.2 Cr");
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"city": "pune", "bhk": 3, "maxPrice": 12000000.0})
        );
    }

    #[test]
    fn test_bedroom_without_budget() {
        let filters = FilterParser::new().parse("2 bedroom flat in Mumbai");
        assert_eq!(filters.city.as_deref(), Some("mumbai"));
        assert_eq!(filters.bhk, Some(2));
        assert!(filters.max_price.is_none());
        assert!(filters.possession.is_none());
    }

    #[test]
    fn test_possession_only() {
        let filters = FilterParser::new().parse("Ready to move apartment");
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"possession": "Ready to Move"})
        );
    }

    #[test]
    fn test_budget_patterns() {
        let parser = FilterParser::new();
        assert_eq!(parser.extract_budget("up to 2 crore"), Some(20_000_000.0));
        assert_eq!(parser.extract_budget("below 1.5cr"), Some(15_000_000.0));
        assert_eq!(parser.extract_budget("under 90 lakhs"), Some(9_000_000.0));
        assert_eq!(parser.extract_budget("around 75 lac"), Some(7_500_000.0));
        assert_eq!(parser.extract_budget("cheap flats"), None);
    }

    #[test]
    fn test_bounded_budget_wins_over_bare_amount() {
        // "under 80 lakh" outranks the bare crore figure earlier in the text
        let parser = FilterParser::new();
        assert_eq!(parser.extract_budget("not 1 cr, under 80 lakh"), Some(8_000_000.0));
    }

    #[test]
    fn test_bhk_variants() {
        let parser = FilterParser::new();
        assert_eq!(parser.extract_bhk("4 bed villa"), Some(4));
        assert_eq!(parser.extract_bhk("1 b/h/k"), Some(1));
        assert_eq!(parser.extract_bhk("studio"), None);
    }

    #[test]
    fn test_locality_and_under_construction() {
        let filters = FilterParser::new().parse("Under construction flats in Baner, Pune");
        assert_eq!(filters.locality.as_deref(), Some("baner"));
        assert_eq!(filters.city.as_deref(), Some("pune"));
        assert_eq!(filters.possession.as_deref(), Some("Under Construction"));
    }

    #[test]
    fn test_city_list_order() {
        let filters = FilterParser::new().parse("pune or mumbai");
        assert_eq!(filters.city.as_deref(), Some("mumbai"));
    }

    #[test]
    fn test_nothing_recognised() {
        assert!(FilterParser::new().parse("hello there").is_empty());
    }

    #[tokio::test]
    async fn test_heuristic_extractor() {
        let extractor = HeuristicFilterExtractor::new();
        let filters = extractor.extract("2 BHK in Hyderabad").await.unwrap();
        assert_eq!(filters.city.as_deref(), Some("hyderabad"));
        assert_eq!(filters.bhk, Some(2));
        assert_eq!(extractor.name(), "keyword");
    }
}
