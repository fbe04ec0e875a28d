//! Structured search filters
//!
//! Every key is optional. An absent key means "no constraint", which is
//! different from a present-but-falsy value, so absent keys are omitted from
//! the serialized form rather than written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter object produced by a [`FilterExtractor`](crate::FilterExtractor)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bhk: Option<u32>,
    /// Upper price bound in rupees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl PropertyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_bhk(mut self, bhk: u32) -> Self {
        self.bhk = Some(bhk);
        self
    }

    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    pub fn with_possession(mut self, possession: impl Into<String>) -> Self {
        self.possession = Some(possession.into());
        self
    }

    pub fn with_amenities(mut self, amenities: Vec<String>) -> Self {
        self.amenities = Some(amenities);
        self
    }

    /// True when no key is set
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.bhk.is_none()
            && self.max_price.is_none()
            && self.locality.is_none()
            && self.possession.is_none()
            && self.amenities.is_none()
    }

    /// Build filters from loosely-typed JSON (typically LLM output)
    ///
    /// Unknown keys are ignored. `null`, empty strings and values of the
    /// wrong shape are treated as absent. Numbers given as strings
    /// (`"3"`, `"12000000"`) and integral floats (`3.0`) are accepted.
    pub fn from_json_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let bhk = obj.get("bhk").and_then(number).and_then(|n| {
            (n.fract() == 0.0 && n >= 1.0 && n <= u32::MAX as f64).then_some(n as u32)
        });

        let max_price = obj
            .get("maxPrice")
            .or_else(|| obj.get("max_price"))
            .and_then(number)
            .filter(|n| *n > 0.0);

        let amenities = obj.get("amenities").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Self {
            city: text("city"),
            bhk,
            max_price,
            locality: text("locality"),
            possession: text("possession"),
            amenities: amenities.filter(|a| !a.is_empty()),
        }
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}
