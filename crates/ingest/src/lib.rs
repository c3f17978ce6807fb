//! # Data Acquisition
//!
//! Turns the four user-provided CSV exports into typed, in-memory tables.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** All file and CSV concerns live here. Downstream crates
//!   receive a `Dataset` and never see a path or a raw cell.
//! - **Fail early, degrade quietly:** missing files and missing required
//!   columns stop the load with one actionable error; unparseable dates and a
//!   missing payout `date` column only degrade to nulls.
//!
//! ## Public API
//!
//! - `DataSources`: the four file locations.
//! - `load_dataset`: loads and validates all four tables.
//! - `parse_enriched`: reads a previously exported filtered CSV back.
//! - `IngestError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod raw;
pub mod sources;
pub mod tables;

pub use error::IngestError;
pub use raw::RawTable;
pub use sources::{load_dataset, DataSources};
pub use tables::{
    parse_enriched, parse_influencers, parse_payouts, parse_posts, parse_tracking, EnrichedTable,
};
