//! Range validation of merged entries

use propchat_core::{limits, Property};
use serde::{Deserialize, Serialize};

/// Why an entry was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Price,
    Area,
    Bhk,
    City,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Price => "price",
            DropReason::Area => "area",
            DropReason::Bhk => "bhk",
            DropReason::City => "city",
        }
    }
}

/// Per-reason drop counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub checked: usize,
    pub kept: usize,
    pub dropped_price: usize,
    pub dropped_area: usize,
    pub dropped_bhk: usize,
    pub dropped_city: usize,
}

impl ValidationReport {
    pub fn dropped(&self) -> usize {
        self.dropped_price + self.dropped_area + self.dropped_bhk + self.dropped_city
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Price => self.dropped_price += 1,
            DropReason::Area => self.dropped_area += 1,
            DropReason::Bhk => self.dropped_bhk += 1,
            DropReason::City => self.dropped_city += 1,
        }
    }
}

/// First failing check, in the order price, area, bhk, city
pub fn check(property: &Property) -> Result<(), DropReason> {
    if !limits::PRICE_INR.contains(&property.price) {
        return Err(DropReason::Price);
    }
    if !limits::AREA_SQFT.contains(&property.area) {
        return Err(DropReason::Area);
    }
    if !limits::BHK.contains(&property.bhk) {
        return Err(DropReason::Bhk);
    }
    if property.city.trim().is_empty() {
        return Err(DropReason::City);
    }
    Ok(())
}

/// Keep entries passing every check, order preserved
pub fn validate(properties: Vec<Property>) -> (Vec<Property>, ValidationReport) {
    let mut report = ValidationReport {
        checked: properties.len(),
        ..Default::default()
    };

    let kept: Vec<Property> = properties
        .into_iter()
        .filter(|property| match check(property) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(id = %property.id, reason = reason.as_str(), "Dropping entry");
                report.record(reason);
                false
            }
        })
        .collect();

    report.kept = kept.len();

    if report.dropped() > 0 {
        metrics::counter!("propchat_properties_dropped_total", "stage" => "validation")
            .increment(report.dropped() as u64);
        tracing::info!(
            checked = report.checked,
            kept = report.kept,
            price = report.dropped_price,
            area = report.dropped_area,
            bhk = report.dropped_bhk,
            city = report.dropped_city,
            "Validation dropped entries"
        );
    }

    (kept, report)
}
