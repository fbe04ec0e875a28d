//! Text processing for property search queries
//!
//! This crate provides the rule-based side of filter extraction:
//! - **Filter Extraction**: city, BHK, budget, locality and possession from
//!   free text, without any remote service
//!
//! # Example
//!
//! ```ignore
//! use propchat_text_processing::FilterParser;
//!
//! let filters = FilterParser::new().parse("3BHK in Pune under 1.2 Cr");
//! assert_eq!(filters.bhk, Some(3));
//! ```

pub mod filter_extraction;

pub use filter_extraction::{FilterParser, HeuristicFilterExtractor};
