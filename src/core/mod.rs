//! Core processing logic for chatsieve.
//!
//! This module contains:
//! - [`extractor`] - Message containers to [`ParsedMessage`] records
//! - [`filter`] - Call filter
//! - [`summary`] - Monthly/weekly summary aggregation
//! - [`models`] - Windows, buckets and operation results
//!
//! [`ParsedMessage`]: crate::ParsedMessage

pub mod extractor;
pub mod filter;
pub mod models;
pub mod summary;

// Re-export main types for convenience
pub use extractor::{MessageExtractor, extract_messages};
pub use filter::filter_calls;
pub use models::{OperationOutcome, StageOutcome, SummaryType, TimeBucket, Window};
pub use summary::{BucketSet, aggregate, rewrite_buckets};
