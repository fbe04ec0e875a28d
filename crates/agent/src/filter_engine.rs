//! Query filter engine
//!
//! Every set key of [`PropertyFilters`] is a predicate and an entry matches
//! only when all of them hold. Text keys match as case-insensitive
//! substrings, so `"pune"` matches `"Pune"` and `"ready"` matches
//! `"Ready to Move"`.

use propchat_core::{Property, PropertyFilters};

/// Whether `property` satisfies every key set in `filters`
pub fn matches(property: &Property, filters: &PropertyFilters) -> bool {
    if let Some(city) = &filters.city {
        if !contains_ci(&property.city, city) {
            return false;
        }
    }

    if let Some(locality) = &filters.locality {
        match &property.locality {
            Some(value) if contains_ci(value, locality) => {}
            _ => return false,
        }
    }

    if let Some(possession) = &filters.possession {
        if !contains_ci(property.possession.as_str(), possession) {
            return false;
        }
    }

    if let Some(bhk) = filters.bhk {
        if property.bhk != bhk {
            return false;
        }
    }

    if let Some(max_price) = filters.max_price {
        if property.price > max_price {
            return false;
        }
    }

    if let Some(amenities) = &filters.amenities {
        if !amenities.iter().all(|tag| property.has_amenity(tag)) {
            return false;
        }
    }

    true
}

/// Entries matching `filters`, in collection order
pub fn apply_filters<'a>(properties: &'a [Property], filters: &PropertyFilters) -> Vec<&'a Property> {
    properties.iter().filter(|p| matches(p, filters)).collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}
