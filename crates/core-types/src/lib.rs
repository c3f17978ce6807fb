//! # Core Types
//!
//! The shared vocabulary of the workspace: the four input relations, the
//! enriched tracking row produced by the join, the filterable dimensions and
//! the small parsing helpers every layer agrees on (key normalization and
//! permissive dates).
//!
//! As a Layer 0 crate it has no knowledge of files, terminals or reports.

pub mod enums;
pub mod error;
pub mod parse;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Dimension;
pub use error::CoreError;
pub use parse::{normalize_key, normalize_text, parse_date};
pub use structs::{
    extra_columns, Dataset, EnrichedEvent, Influencer, Payout, Post, Tracking, TrackingEvent,
    TRACKING_FIELDS,
};
