//! Property entry types
//!
//! A [`Property`] is the canonical merged record: one sellable unit
//! configuration of a project. Entries are built once by the dataset crate
//! and never mutated afterwards; queries only select subsets.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Plausibility limits every validated entry satisfies
pub mod limits {
    use super::RangeInclusive;

    /// Bedroom count
    pub const BHK: RangeInclusive<u32> = 1..=10;
    /// Carpet area in square feet
    pub const AREA_SQFT: RangeInclusive<f64> = 300.0..=5_000.0;
    /// Price in rupees
    pub const PRICE_INR: RangeInclusive<f64> = 500_000.0..=500_000_000.0;
}

/// Possession status of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Possession {
    #[serde(rename = "Ready to Move")]
    ReadyToMove,
    #[serde(rename = "Under Construction")]
    UnderConstruction,
    #[serde(rename = "New Launch")]
    NewLaunch,
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Possession {
    /// All statuses in display order
    pub const ALL: [Possession; 4] = [
        Possession::ReadyToMove,
        Possession::UnderConstruction,
        Possession::NewLaunch,
        Possession::Unknown,
    ];

    /// Human-readable label, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Possession::ReadyToMove => "Ready to Move",
            Possession::UnderConstruction => "Under Construction",
            Possession::NewLaunch => "New Launch",
            Possession::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Possession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A merged, validated property entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Variant id when the entry comes from a variant, else configuration id
    pub id: String,
    pub project_id: String,
    pub config_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,

    pub project_name: String,
    pub builder: String,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rera_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    pub city: String,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,

    pub bhk: u32,
    /// Carpet area in square feet
    pub area: f64,
    /// Price in rupees
    pub price: f64,

    pub possession: Possession,
    pub amenities: Vec<String>,
    #[serde(default)]
    pub property_images: Vec<String>,
    #[serde(default)]
    pub floor_plan_images: Vec<String>,
}

impl Property {
    /// Whether `tag` appears among the amenities (case-insensitive substring)
    pub fn has_amenity(&self, tag: &str) -> bool {
        let needle = tag.to_lowercase();
        self.amenities
            .iter()
            .any(|a| a.to_lowercase().contains(&needle))
    }
}

/// Format a rupee amount the way listings quote it
///
/// Amounts of a crore or more are shown in crore, amounts of a lakh or more
/// in lakh, anything smaller as whole rupees.
pub fn format_price(amount: f64) -> String {
    if amount >= 10_000_000.0 {
        format!("₹{:.2} Cr", amount / 10_000_000.0)
    } else if amount >= 100_000.0 {
        format!("₹{:.2} Lakh", amount / 100_000.0)
    } else {
        format!("₹{:.0}", amount)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_possession_serialization() {
        let json = serde_json::to_string(&Possession::ReadyToMove).unwrap();
        assert_eq!(json, "\"Ready to Move\"");

        let parsed: Possession = serde_json::from_str("\"Under Construction\"").unwrap();
        assert_eq!(parsed, Possession::UnderConstruction);
    }

    #[test]
    fn test_property_camel_case_keys() {
        let property = fixtures::property("v1", "Pune", 2, 9_000_000.0);
        let json = serde_json::to_value(&property).unwrap();

        assert!(json.get("projectName").is_some());
        assert!(json.get("propertyImages").is_some());
        // Absent optional identity fields are omitted entirely
        assert!(json.get("variantId").is_none());
    }

    #[test]
    fn test_has_amenity() {
        let property = fixtures::property("v1", "Pune", 2, 9_000_000.0);
        assert!(property.has_amenity("security"));
        assert!(property.has_amenity("water"));
        assert!(!property.has_amenity("gym"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12_000_000.0), "₹1.20 Cr");
        assert_eq!(format_price(8_500_000.0), "₹85.00 Lakh");
        assert_eq!(format_price(75_000.0), "₹75000");
    }

    #[test]
    fn test_limits() {
        assert!(limits::BHK.contains(&10));
        assert!(!limits::AREA_SQFT.contains(&299.0));
        assert!(limits::PRICE_INR.contains(&500_000.0));
    }
}
