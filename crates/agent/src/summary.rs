//! Deterministic result summaries
//!
//! Used when no language model is configured or the model call fails. The
//! sentences are built from the [`ResultDigest`] alone, the same data a model
//! would see.

use async_trait::async_trait;
use propchat_core::{format_price, Possession, PropertyFilters, Result, ResultDigest, SummaryGenerator, SummaryRequest};

/// [`SummaryGenerator`] composing fixed sentences from the digest
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateSummaryGenerator;

impl TemplateSummaryGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Summary of a non-empty result set
    pub fn describe(digest: &ResultDigest) -> String {
        let noun = if digest.total == 1 { "property" } else { "properties" };
        let mut summary = format!(
            "I found {} {} in {} ({})",
            digest.total,
            noun,
            digest.cities.join(", "),
            digest.bhk_label()
        );

        if digest.min_price_label == digest.max_price_label {
            summary.push_str(&format!(" priced at {}.", digest.min_price_label));
        } else {
            summary.push_str(&format!(
                " priced from {} to {}.",
                digest.min_price_label, digest.max_price_label
            ));
        }

        if !digest.top_localities.is_empty() {
            summary.push_str(&format!(" Popular localities: {}.", digest.top_localities.join(", ")));
        }

        let statuses: Vec<String> = digest
            .possession
            .iter()
            .filter(|p| p.status != Possession::Unknown)
            .map(|p| format!("{} {}", p.count, p.status.as_str().to_lowercase()))
            .collect();
        if !statuses.is_empty() {
            summary.push_str(&format!(" Status: {}.", statuses.join(", ")));
        }

        if !digest.top_amenities.is_empty() {
            summary.push_str(&format!(" Common amenities include {}.", digest.top_amenities.join(", ")));
        }

        summary
    }

    /// Apology for an empty result set, one suggestion per set filter
    pub fn apologize(filters: &PropertyFilters) -> String {
        let mut suggestions = Vec::new();

        if let Some(max_price) = filters.max_price {
            suggestions.push(format!("increasing your budget above {}", format_price(max_price)));
        }
        if filters.bhk.is_some() {
            suggestions.push("trying a different BHK configuration".to_string());
        }
        if filters.city.is_some() {
            suggestions.push("searching in a nearby city".to_string());
        }
        if filters.possession.is_some() {
            suggestions.push("including other possession statuses".to_string());
        }

        let mut reply = "Sorry, I couldn't find any properties matching your search.".to_string();
        match suggestions.len() {
            0 => reply.push_str(" Try describing the city, budget or number of bedrooms you are looking for."),
            1 => reply.push_str(&format!(" You could try {}.", suggestions[0])),
            _ => {
                let last = suggestions.pop().unwrap_or_default();
                reply.push_str(&format!(" You could try {} or {}.", suggestions.join(", "), last));
            }
        }
        reply
    }
}

#[async_trait]
impl SummaryGenerator for TemplateSummaryGenerator {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        Ok(match &request.digest {
            Some(digest) => Self::describe(digest),
            None => Self::apologize(&request.filters),
        })
    }

    fn name(&self) -> &str {
        "template"
    }
}
