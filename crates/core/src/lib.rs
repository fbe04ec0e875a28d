//! Core types and traits for the property chat service
//!
//! This crate provides the foundational types shared by every other crate:
//! - [`Property`] entries and their plausibility limits
//! - [`PropertyFilters`], the structured query
//! - [`ResultDigest`] / [`SummaryRequest`], the aggregate view handed to
//!   summary generators
//! - Capability traits [`FilterExtractor`] and [`SummaryGenerator`]
//! - Error types

pub mod digest;
pub mod error;
pub mod filters;
pub mod property;
pub mod traits;

pub use digest::{PossessionCount, ResultDigest, SummaryRequest};
pub use error::{Error, Result};
pub use filters::PropertyFilters;
pub use property::{format_price, limits, Possession, Property};
pub use traits::{FilterExtractor, SummaryGenerator};
