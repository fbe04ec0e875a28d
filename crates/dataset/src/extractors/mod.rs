//! Field extractors
//!
//! Pure functions turning raw source cells into typed property fields.
//! None of them fail: unusable input yields `None` or an empty list.

mod amenities;
mod listing;
mod location;
mod price;

pub use amenities::{extract_amenities, BASE_AMENITIES};
pub use listing::{extract_builder, parse_images, parse_possession, parse_rera_id};
pub use location::{extract_city, extract_location, is_valid_locality, Location};
pub use price::{extract_bhk, parse_area, parse_price};
