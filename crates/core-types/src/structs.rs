use crate::enums::Dimension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the influencer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Influencer {
    pub id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub platform: Option<String>,
    pub follower_count: Option<u64>,
}

/// A single social post and its reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub url: String,
    pub reach: u64,
    pub influencer_id: Option<String>,
    pub platform: Option<String>,
    pub date: Option<NaiveDate>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// Tracking columns with a typed home on `TrackingEvent`.
pub const TRACKING_FIELDS: [&str; 4] = ["influencer_id", "source", "date", "revenue"];

/// A tracked conversion attributed to an influencer.
///
/// Columns outside the known schema are carried verbatim in `extra`, aligned
/// with `Tracking::extra_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub influencer_id: Option<String>,
    /// The brand the conversion was tracked for.
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
    pub revenue: Decimal,
    pub extra: Vec<String>,
}

/// The tracking relation: events plus the column layout of the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    /// Every column in file order, typed fields included.
    pub columns: Vec<String>,
    pub events: Vec<TrackingEvent>,
}

impl Tracking {
    /// The carried-through columns, in the order of `TrackingEvent::extra`.
    pub fn extra_columns(&self) -> Vec<&str> {
        extra_columns(&self.columns)
    }
}

/// The entries of a tracking layout that are not `TRACKING_FIELDS`.
pub fn extra_columns(columns: &[String]) -> Vec<&str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| !TRACKING_FIELDS.contains(c))
        .collect()
}

/// A payout made to an influencer. `date` is null when the export has no date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub influencer_id: Option<String>,
    pub total_payout: Decimal,
    pub date: Option<NaiveDate>,
}

/// A tracking event with the demographics of its influencer joined in.
/// Demographics are null when the influencer is not on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub event: TrackingEvent,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub platform: Option<String>,
}

impl EnrichedEvent {
    /// The value this row carries for a filterable dimension.
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Platform => self.platform.as_deref(),
            Dimension::Gender => self.gender.as_deref(),
            Dimension::Category => self.category.as_deref(),
            Dimension::Source => self.event.source.as_deref(),
        }
    }
}

/// One in-memory snapshot of the four input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub influencers: Vec<Influencer>,
    pub posts: Vec<Post>,
    pub tracking: Tracking,
    pub payouts: Vec<Payout>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_columns_skip_typed_fields_and_keep_order() {
        let tracking = Tracking {
            columns: ["campaign", "influencer_id", "date", "orders", "revenue"]
                .map(String::from)
                .to_vec(),
            events: vec![],
        };
        assert_eq!(tracking.extra_columns(), vec!["campaign", "orders"]);
    }
}
