//! Property chat service
//!
//! Composes filter extraction, the query filter engine and summary
//! generation over a loaded [`PropertyStore`](propchat_dataset::PropertyStore).
//! Each capability prefers the language model and falls back to a local
//! implementation when the model is missing or fails.

pub mod chat;
pub mod fallback;
pub mod filter_engine;
pub mod summary;

pub use chat::{ChatReply, ChatService, Listing};
pub use fallback::{FallbackFilterExtractor, FallbackSummaryGenerator};
pub use filter_engine::{apply_filters, matches};
pub use summary::TemplateSummaryGenerator;
