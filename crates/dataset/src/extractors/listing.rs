//! Descriptive fields: builder, possession, RERA id, image lists
//!
//! Several source columns hold JSON arrays serialized into a CSV cell, and
//! some of those are truncated or hand-edited. Parsing falls back to
//! regex salvage and never fails.

use once_cell::sync::Lazy;
use propchat_core::Possession;
use regex::Regex;
use serde_json::Value;

static QUOTED_STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static QUOTED_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(https?://[^"\s]+)""#).unwrap());

/// Builder name derived from the first word of the project name
pub fn extract_builder(project_name: &str) -> String {
    match project_name.split_whitespace().next() {
        Some(first) => format!("{} Builders", first),
        None => "Unknown Builders".to_string(),
    }
}

/// Possession status from the raw project status
pub fn parse_possession(status: &str) -> Possession {
    let status = status.to_lowercase();
    if status.contains("ready") {
        Possession::ReadyToMove
    } else if status.contains("under") {
        Possession::UnderConstruction
    } else if status.contains("new") {
        Possession::NewLaunch
    } else {
        Possession::Unknown
    }
}

/// First registration id of an array-shaped cell
///
/// A cell that is not array-shaped at all is taken as the id itself.
pub fn parse_rera_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        Ok(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ if !raw.starts_with('[') && !raw.contains('"') => Some(raw.to_string()),
        _ => QUOTED_STRING
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|s| !s.is_empty())
            .map(str::to_string),
    }
}

/// Image URLs of an array-shaped cell, in order
///
/// Array items may be plain strings or objects with a `url` or `src` member.
pub fn parse_images(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().filter_map(image_url).collect(),
        Ok(Value::String(s)) if is_url(&s) => vec![s.trim().to_string()],
        Err(_) if is_url(raw) && !raw.contains(',') => vec![raw.to_string()],
        Err(_) => QUOTED_URL
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn image_url(item: &Value) -> Option<String> {
    let url = match item {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("src"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

fn is_url(s: &str) -> bool {
    let s = s.trim();
    s.starts_with("http://") || s.starts_with("https://")
}
