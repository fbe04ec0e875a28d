//! Amenity tags from free-text descriptions

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags every entry carries
pub const BASE_AMENITIES: [&str; 3] = ["Security", "Water Supply", "Power Backup"];

/// Larger units are assumed to come with these
const LARGE_UNIT_AMENITIES: [&str; 2] = ["Club House", "Swimming Pool"];
const LARGE_UNIT_MIN_BHK: u32 = 3;

/// (keyword pattern, tag) in output order
static AMENITY_KEYWORDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)pool|swimming").unwrap(), "Swimming Pool"),
        (Regex::new(r"(?i)gym|fitness").unwrap(), "Gym"),
        (Regex::new(r"(?i)park|garden").unwrap(), "Park"),
        (Regex::new(r"(?i)club").unwrap(), "Club House"),
        (Regex::new(r"(?i)\blift|elevator").unwrap(), "Lift"),
        (Regex::new(r"(?i)parking|car\s*park").unwrap(), "Parking"),
        (Regex::new(r"(?i)play|children").unwrap(), "Play Area"),
    ]
});

/// Ordered, de-duplicated amenity tags
pub fn extract_amenities(about: &str, bhk: u32) -> Vec<String> {
    let mut tags: Vec<&'static str> = BASE_AMENITIES.to_vec();

    let mut push = |tag: &'static str| {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    for (pattern, tag) in AMENITY_KEYWORDS.iter() {
        if pattern.is_match(about) {
            push(tag);
        }
    }

    if bhk >= LARGE_UNIT_MIN_BHK {
        for tag in LARGE_UNIT_AMENITIES {
            push(tag);
        }
    }

    tags.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_set_always_present() {
        assert_eq!(
            extract_amenities("", 1),
            vec!["Security", "Water Supply", "Power Backup"]
        );
    }

    #[test]
    fn test_keywords_in_fixed_order() {
        let tags = extract_amenities("Kids play area, gymnasium and a landscaped garden", 2);
        assert_eq!(
            tags,
            vec!["Security", "Water Supply", "Power Backup", "Gym", "Park", "Play Area"]
        );
    }

    #[test]
    fn test_large_units_add_club_and_pool_once() {
        let tags = extract_amenities("Rooftop swimming pool and clubhouse", 3);
        assert_eq!(tags.iter().filter(|t| *t == "Swimming Pool").count(), 1);
        assert_eq!(tags.iter().filter(|t| *t == "Club House").count(), 1);
        assert_eq!(tags[3], "Swimming Pool");
        assert_eq!(tags[4], "Club House");
    }

    #[test]
    fn test_covered_parking_also_reads_as_park() {
        let tags = extract_amenities("Covered parking", 2);
        assert!(tags.contains(&"Park".to_string()));
        assert!(tags.contains(&"Parking".to_string()));
    }

    #[test]
    fn test_lift_needs_word_start() {
        assert!(extract_amenities("High speed lifts", 1).contains(&"Lift".to_string()));
        assert!(extract_amenities("Service elevator", 1).contains(&"Lift".to_string()));
        assert!(!extract_amenities("Uplifting views", 1).contains(&"Lift".to_string()));
    }

    #[test]
    fn test_car_park_reads_as_parking() {
        let tags = extract_amenities("Multi-level car park", 2);
        assert_eq!(
            tags,
            vec!["Security", "Water Supply", "Power Backup", "Park", "Parking"]
        );
    }
}
