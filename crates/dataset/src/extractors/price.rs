//! Numeric field extraction: BHK, price, carpet area

use once_cell::sync::Lazy;
use propchat_core::limits;
use regex::Regex;

const LAKH: f64 = 100_000.0;

static BHK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*bhk").unwrap());

/// Bedroom count from a configuration label such as `"3 BHK Apartment"`
pub fn extract_bhk(config_type: &str) -> Option<u32> {
    BHK_PATTERN
        .captures(config_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Keep only digits and dots, then parse
fn numeric_part(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Price in rupees from a free-form price cell
///
/// Small figures are read as lakhs (`"80"` is 80 lakh). Values above the
/// plausible ceiling are rejected.
pub fn parse_price(raw: &str) -> Option<f64> {
    let value = numeric_part(raw)?;

    if value <= 0.0 {
        return None;
    }

    if value < 1_000.0 {
        return Some(value * LAKH);
    }

    if value < 100_000.0 {
        // Round figures up to 200 would be lakhs; none fall in this band
        if value <= 200.0 && value % 10.0 == 0.0 {
            return Some(value * LAKH);
        }
        return Some(value);
    }

    if value > *limits::PRICE_INR.end() {
        return None;
    }

    Some(value)
}

/// Carpet area in square feet, `None` outside the plausible range
pub fn parse_area(raw: &str) -> Option<f64> {
    numeric_part(raw).filter(|area| limits::AREA_SQFT.contains(area))
}
