//! Prompt Building
//!
//! Constructs the two prompts the service sends: filter extraction and
//! result summary. Summary prompts carry the aggregate digest only.

use std::fmt;

use propchat_core::SummaryRequest;
use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Instructions for turning a query into a filter object
pub const FILTER_SYSTEM_PROMPT: &str = r#"You convert property search requests into JSON filters.
Reply with one JSON object and nothing else. Allowed keys:
- "city": city name as the user wrote it
- "bhk": number of bedrooms, integer
- "maxPrice": budget ceiling in rupees, number (1 lakh = 100000, 1 crore = 10000000)
- "locality": neighbourhood or area name
- "possession": one of "Ready to Move", "Under Construction", "New Launch"
- "amenities": list of amenity names
Leave out every key the user did not mention."#;

/// Instructions for summarizing a non-empty result set
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a property search assistant. \
Write two or three friendly sentences describing the search results summarized by the JSON statistics below. \
Use only figures that appear in the statistics and quote prices exactly as labelled. \
Never name a project, builder or listing.";

/// Instructions for answering when nothing matched
pub const EMPTY_SUMMARY_SYSTEM_PROMPT: &str = "You are a property search assistant. \
No listings matched the user's filters. Apologize in one sentence, then suggest one or two ways \
to relax the filters shown, such as a higher budget, a different BHK count, another city or \
another possession status.";

/// Messages for filter extraction
pub fn filter_messages(query: &str) -> Vec<Message> {
    vec![Message::system(FILTER_SYSTEM_PROMPT), Message::user(query)]
}

/// Messages for a result summary
pub fn summary_messages(request: &SummaryRequest) -> Result<Vec<Message>, serde_json::Error> {
    let filters = serde_json::to_string(&request.filters)?;

    let (system, body) = match &request.digest {
        Some(digest) => (
            SUMMARY_SYSTEM_PROMPT,
            format!(
                "Query: {}\nFilters: {}\nStatistics: {}",
                request.query,
                filters,
                serde_json::to_string(digest)?
            ),
        ),
        None => (
            EMPTY_SUMMARY_SYSTEM_PROMPT,
            format!("Query: {}\nFilters: {}\nMatches: 0", request.query, filters),
        ),
    };

    Ok(vec![Message::system(system), Message::user(body)])
}
