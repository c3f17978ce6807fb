//! # ROI Analytics Engine
//!
//! This crate turns the four input tables into the campaign's return-on-ad-spend
//! metrics and leaderboards.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or report formats. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every metric is a pure function of its inputs. The
//!   joins and group-bys are explicit hash/ordered-map passes over record slices.
//! - **Recompute on change:** `DashboardSession` owns one snapshot of the data and
//!   rebuilds every output from scratch whenever a filter changes.
//!
//! ## Public API
//!
//! - `pipeline`: `enrich`, `apply_filter`, `summary`, `time_series`,
//!   `persona_ranking`, `bottom_influencers`, `top_influencers`, `top_posts`.
//! - `FilterPredicate`, `FilterOptions`, `DateRange`: the filter controls.
//! - `AnalyticsEngine`: assembles a complete `DashboardView`.
//! - `DashboardSession`: the stateful wrapper used by interactive front ends.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod report;
pub mod session;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, RankingSizes};
pub use error::AnalyticsError;
pub use filter::{DateRange, FilterOptions, FilterPredicate, Selection};
pub use report::{CampaignSummary, DashboardView, InfluencerRoas, PersonaShare, RoasPoint, BASELINE_ROAS};
pub use session::DashboardSession;
