use crate::engine::AnalyticsEngine;
use crate::error::AnalyticsError;
use crate::filter::{DateRange, FilterOptions, FilterPredicate, Selection};
use crate::pipeline;
use crate::report::DashboardView;
use chrono::NaiveDate;
use core_types::{Dataset, Dimension, EnrichedEvent};

/// One user's dashboard: a private snapshot of the data plus the current
/// filter selection.
///
/// The join is done once; every filter change re-filters and the view is
/// recomputed from scratch on each call to `view`.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Dataset,
    engine: AnalyticsEngine,
    enriched: Vec<EnrichedEvent>,
    options: FilterOptions,
    observed_range: Option<DateRange>,
    predicate: FilterPredicate,
    date_range: Option<DateRange>,
    filtered: Vec<EnrichedEvent>,
}

impl DashboardSession {
    /// Starts a session with the default selection: every observed value and
    /// the observed tracking date range.
    pub fn new(dataset: Dataset, engine: AnalyticsEngine) -> Self {
        let enriched = pipeline::enrich(&dataset.tracking.events, &dataset.influencers);
        let options = FilterOptions::observe(&enriched);
        let observed_range = DateRange::observed(&dataset.tracking.events);
        let predicate = options.default_predicate();
        let filtered = pipeline::apply_filter(&enriched, &predicate);

        tracing::info!(
            rows = enriched.len(),
            filtered = filtered.len(),
            "Dashboard session started."
        );

        Self {
            dataset,
            engine,
            enriched,
            options,
            observed_range,
            predicate,
            date_range: observed_range,
            filtered,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn observed_range(&self) -> Option<DateRange> {
        self.observed_range
    }

    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// The enriched rows that pass the current predicate.
    pub fn filtered(&self) -> &[EnrichedEvent] {
        &self.filtered
    }

    /// The tracking file's column layout, for export.
    pub fn tracking_columns(&self) -> &[String] {
        &self.dataset.tracking.columns
    }

    /// Restricts one dimension. Values that were never observed are allowed
    /// and simply match nothing.
    pub fn select<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate.set(dimension, Selection::only(values));
        self.refilter();
    }

    /// Restores one dimension to every observed value.
    pub fn select_observed(&mut self, dimension: Dimension) {
        let selection = self.options.default_predicate().selection(dimension).clone();
        self.predicate.set(dimension, selection);
        self.refilter();
    }

    /// Replaces the whole predicate.
    pub fn set_predicate(&mut self, predicate: FilterPredicate) {
        self.predicate = predicate;
        self.refilter();
    }

    /// Sets the time-series bounds; an open bound falls back to the observed range.
    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), AnalyticsError> {
        self.date_range = DateRange::resolve(start, end, self.observed_range)?;
        Ok(())
    }

    /// Back to every observed value and the observed date range.
    pub fn reset(&mut self) {
        self.predicate = self.options.default_predicate();
        self.date_range = self.observed_range;
        self.refilter();
    }

    pub fn view(&self) -> DashboardView {
        self.engine
            .calculate(&self.dataset, &self.filtered, &self.predicate, self.date_range)
    }

    fn refilter(&mut self) {
        self.filtered = pipeline::apply_filter(&self.enriched, &self.predicate);
        tracing::debug!(filtered = self.filtered.len(), "Filter applied.");
    }
}
