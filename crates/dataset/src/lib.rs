//! Property dataset pipeline
//!
//! Loader → Merger (using the field extractors) → Validator → [`PropertyStore`].
//! The store is built once, persisted as JSON, and shared read-only.

pub mod error;
pub mod extractors;
pub mod loader;
pub mod merger;
pub mod store;
pub mod validator;

pub use error::DatasetError;
pub use loader::{read_table, RawRow, SourceTables};
pub use merger::{build_drafts, merge, DraftSet, MergeOutcome, MergeReport, PropertyDraft};
pub use store::{read_merged, write_merged, CityCount, DataSource, PropertyStore};
pub use validator::{validate, DropReason, ValidationReport};
