//! Aggregate view of a result set
//!
//! Summaries are written from a [`ResultDigest`] only. Raw per-property
//! records never reach the language model, so it cannot quote a listing
//! that does not exist.

use serde::{Deserialize, Serialize};

use crate::filters::PropertyFilters;
use crate::property::{format_price, Possession, Property};

/// Number of localities kept in a digest
pub const TOP_LOCALITIES: usize = 3;
/// Number of amenities kept in a digest
pub const TOP_AMENITIES: usize = 5;

/// Count of entries with a given possession status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionCount {
    pub status: Possession,
    pub count: usize,
}

/// Aggregate statistics over a non-empty result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDigest {
    pub total: usize,
    /// Distinct cities in first-seen order
    pub cities: Vec<String>,
    /// Most frequent localities, ties broken by first appearance
    pub top_localities: Vec<String>,
    pub min_bhk: u32,
    pub max_bhk: u32,
    pub min_price: f64,
    pub max_price: f64,
    pub min_price_label: String,
    pub max_price_label: String,
    /// Non-zero counts in [`Possession::ALL`] order
    pub possession: Vec<PossessionCount>,
    /// Most frequent amenities, ties broken by first appearance
    pub top_amenities: Vec<String>,
}

impl ResultDigest {
    /// Build a digest, or `None` for an empty result set
    pub fn from_properties<'a, I>(properties: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Property>,
    {
        let mut total = 0usize;
        let mut cities: Vec<String> = Vec::new();
        let mut localities = Tally::default();
        let mut amenities = Tally::default();
        let mut possession = [0usize; 4];
        let (mut min_bhk, mut max_bhk) = (u32::MAX, 0u32);
        let (mut min_price, mut max_price) = (f64::INFINITY, 0.0f64);

        for property in properties {
            total += 1;

            if !cities.iter().any(|c| c.eq_ignore_ascii_case(&property.city)) {
                cities.push(property.city.clone());
            }
            if let Some(locality) = &property.locality {
                localities.add(locality);
            }
            for amenity in &property.amenities {
                amenities.add(amenity);
            }

            let slot = Possession::ALL
                .iter()
                .position(|p| *p == property.possession)
                .unwrap_or(Possession::ALL.len() - 1);
            possession[slot] += 1;

            min_bhk = min_bhk.min(property.bhk);
            max_bhk = max_bhk.max(property.bhk);
            min_price = min_price.min(property.price);
            max_price = max_price.max(property.price);
        }

        if total == 0 {
            return None;
        }

        Some(Self {
            total,
            cities,
            top_localities: localities.top(TOP_LOCALITIES),
            min_bhk,
            max_bhk,
            min_price,
            max_price,
            min_price_label: format_price(min_price),
            max_price_label: format_price(max_price),
            possession: Possession::ALL
                .iter()
                .zip(possession)
                .filter(|(_, count)| *count > 0)
                .map(|(status, count)| PossessionCount { status: *status, count })
                .collect(),
            top_amenities: amenities.top(TOP_AMENITIES),
        })
    }

    /// "2 BHK" or "2-4 BHK"
    pub fn bhk_label(&self) -> String {
        if self.min_bhk == self.max_bhk {
            format!("{} BHK", self.min_bhk)
        } else {
            format!("{}-{} BHK", self.min_bhk, self.max_bhk)
        }
    }

    /// Count for one possession status
    pub fn possession_count(&self, status: Possession) -> usize {
        self.possession
            .iter()
            .find(|p| p.status == status)
            .map(|p| p.count)
            .unwrap_or(0)
    }
}

/// Frequency counter that remembers first-seen order
#[derive(Default)]
struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    fn add(&mut self, value: &str) {
        match self.entries.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((value.to_string(), 1)),
        }
    }

    fn top(mut self, n: usize) -> Vec<String> {
        // Stable sort keeps first-seen order among equal counts
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.into_iter().take(n).map(|(v, _)| v).collect()
    }
}

/// Everything a [`SummaryGenerator`](crate::SummaryGenerator) may see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub query: String,
    pub filters: PropertyFilters,
    pub total_matches: usize,
    /// `None` when nothing matched
    pub digest: Option<ResultDigest>,
}

impl SummaryRequest {
    pub fn new<'a, I>(query: impl Into<String>, filters: PropertyFilters, results: I) -> Self
    where
        I: IntoIterator<Item = &'a Property>,
    {
        let digest = ResultDigest::from_properties(results);
        Self {
            query: query.into(),
            filters,
            total_matches: digest.as_ref().map(|d| d.total).unwrap_or(0),
            digest,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.digest.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::fixtures::property;

    fn sample() -> Vec<Property> {
        let mut a = property("1", "Pune", 2, 9_000_000.0);
        a.locality = Some("Baner".to_string());
        a.amenities.push("Gym".to_string());

        let mut b = property("2", "Pune", 3, 15_000_000.0);
        b.locality = Some("Wakad".to_string());
        b.possession = Possession::UnderConstruction;

        let mut c = property("3", "Mumbai", 2, 25_000_000.0);
        c.locality = Some("Wakad".to_string());
        c.amenities.push("Gym".to_string());

        vec![a, b, c]
    }

    #[test]
    fn test_empty_results_have_no_digest() {
        assert!(ResultDigest::from_properties(&Vec::<Property>::new()).is_none());
    }

    #[test]
    fn test_digest_aggregates() {
        let properties = sample();
        let digest = ResultDigest::from_properties(&properties).unwrap();

        assert_eq!(digest.total, 3);
        assert_eq!(digest.cities, vec!["Pune", "Mumbai"]);
        assert_eq!(digest.top_localities, vec!["Wakad", "Baner"]);
        assert_eq!(digest.bhk_label(), "2-3 BHK");
        assert_eq!(digest.min_price_label, "₹90.00 Lakh");
        assert_eq!(digest.max_price_label, "₹2.50 Cr");
        assert_eq!(digest.possession_count(Possession::ReadyToMove), 2);
        assert_eq!(digest.possession_count(Possession::UnderConstruction), 1);
        assert_eq!(digest.possession_count(Possession::NewLaunch), 0);
    }

    #[test]
    fn test_top_amenities_by_frequency() {
        let properties = sample();
        let digest = ResultDigest::from_properties(&properties).unwrap();

        assert_eq!(digest.top_amenities.len(), 4);
        assert_eq!(digest.top_amenities[0], "Security");
        assert_eq!(digest.top_amenities[3], "Gym");
    }

    #[test]
    fn test_summary_request_counts() {
        let properties = sample();
        let request = SummaryRequest::new("flats in pune", PropertyFilters::new(), &properties);
        assert_eq!(request.total_matches, 3);
        assert!(!request.is_empty());

        let empty = SummaryRequest::new("castles", PropertyFilters::new(), &Vec::<Property>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.total_matches, 0);
    }
}
