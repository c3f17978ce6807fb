use crate::filter::{DateRange, FilterPredicate};
use crate::pipeline;
use crate::report::DashboardView;
use core_types::{Dataset, EnrichedEvent};
use serde::{Deserialize, Serialize};

/// How many rows each leaderboard keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSizes {
    pub bottom_influencers: usize,
    pub top_influencers: usize,
    pub top_posts: usize,
}

impl Default for RankingSizes {
    fn default() -> Self {
        Self {
            bottom_influencers: 5,
            top_influencers: 10,
            top_posts: 10,
        }
    }
}

/// A stateless calculator that assembles every dashboard output for one selection.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    sizes: RankingSizes,
}

impl AnalyticsEngine {
    pub fn new(sizes: RankingSizes) -> Self {
        Self { sizes }
    }

    pub fn sizes(&self) -> RankingSizes {
        self.sizes
    }

    /// Builds the full view from rows already passed through `predicate`.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The unfiltered input tables.
    /// * `filtered` - Enriched tracking rows that survived the attribute filters.
    /// * `predicate` - The filter that produced `filtered`, echoed into the view.
    /// * `date_range` - Bounds for the ROAS-over-time series.
    pub fn calculate(
        &self,
        dataset: &Dataset,
        filtered: &[EnrichedEvent],
        predicate: &FilterPredicate,
        date_range: Option<DateRange>,
    ) -> DashboardView {
        let summary = pipeline::summary(filtered, &dataset.payouts);

        // The series reads the raw tables; attribute filters do not apply to it.
        let time_series = pipeline::time_series(&dataset.tracking.events, &dataset.payouts, date_range);
        let personas = pipeline::persona_ranking(filtered, summary.total_spend);
        let bottom_influencers = pipeline::bottom_influencers(
            filtered,
            &dataset.payouts,
            &dataset.influencers,
            self.sizes.bottom_influencers,
        );
        let top_influencers = pipeline::top_influencers(
            filtered,
            &dataset.payouts,
            &dataset.influencers,
            self.sizes.top_influencers,
        );
        let top_posts = pipeline::top_posts(&dataset.posts, self.sizes.top_posts);

        tracing::debug!(
            rows = filtered.len(),
            revenue = %summary.total_revenue,
            spend = %summary.total_spend,
            roas = %summary.roas,
            "Dashboard recomputed."
        );

        DashboardView {
            predicate: predicate.clone(),
            date_range,
            filtered_rows: filtered.len(),
            summary,
            time_series,
            top_posts,
            personas,
            bottom_influencers,
            top_influencers,
        }
    }
}
