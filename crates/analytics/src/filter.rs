use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{Dimension, EnrichedEvent, TrackingEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The allowed values of one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum Selection {
    /// No restriction; rows pass whatever their value, null included.
    #[default]
    All,
    /// Only these values pass. A null value never matches.
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(allowed) => value.is_some_and(|v| allowed.contains(v)),
        }
    }
}

/// A conjunction of set-membership tests over the four filter dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterPredicate {
    selections: BTreeMap<Dimension, Selection>,
}

impl FilterPredicate {
    /// A predicate that admits every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn selection(&self, dimension: Dimension) -> &Selection {
        const ALL: &Selection = &Selection::All;
        self.selections.get(&dimension).unwrap_or(ALL)
    }

    pub fn set(&mut self, dimension: Dimension, selection: Selection) {
        self.selections.insert(dimension, selection);
    }

    pub fn with(mut self, dimension: Dimension, selection: Selection) -> Self {
        self.set(dimension, selection);
        self
    }

    pub fn matches(&self, row: &EnrichedEvent) -> bool {
        Dimension::ALL
            .iter()
            .all(|&d| self.selection(d).admits(row.dimension(d)))
    }
}

/// The distinct non-null values observed per dimension, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    values: BTreeMap<Dimension, Vec<String>>,
}

impl FilterOptions {
    pub fn observe(rows: &[EnrichedEvent]) -> Self {
        let mut values: BTreeMap<Dimension, Vec<String>> = BTreeMap::new();
        for &dimension in &Dimension::ALL {
            let mut seen = BTreeSet::new();
            let distinct = rows
                .iter()
                .filter_map(|r| r.dimension(dimension))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
            values.insert(dimension, distinct);
        }
        Self { values }
    }

    pub fn values(&self, dimension: Dimension) -> &[String] {
        self.values.get(&dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every observed value selected. A dimension with nothing observed is left
    /// unrestricted rather than selecting nothing.
    pub fn default_predicate(&self) -> FilterPredicate {
        Dimension::ALL
            .iter()
            .fold(FilterPredicate::all(), |predicate, &d| {
                let observed = self.values(d);
                let selection = if observed.is_empty() {
                    Selection::All
                } else {
                    Selection::only(observed.iter().cloned())
                };
                predicate.with(d, selection)
            })
    }
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Null dates are never inside a range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| d >= self.start && d <= self.end)
    }

    /// `[min, max]` of the tracking dates, or `None` when no date parsed.
    pub fn observed(events: &[TrackingEvent]) -> Option<Self> {
        let mut dates = events.iter().filter_map(|e| e.date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    /// Fills an open bound from the observed range. A bound with nothing to
    /// fill it from stays open.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        observed: Option<DateRange>,
    ) -> Result<Option<Self>, AnalyticsError> {
        let start = start.or(observed.map(|r| r.start));
        let end = end.or(observed.map(|r| r.end));
        match (start, end) {
            (None, None) => Ok(None),
            (start, end) => Self::new(start.unwrap_or(NaiveDate::MIN), end.unwrap_or(NaiveDate::MAX)).map(Some),
        }
    }
}
