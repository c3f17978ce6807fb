use crate::filter::{DateRange, FilterPredicate};
use chrono::NaiveDate;
use core_types::Post;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Break-even ROAS. Incremental ROAS is measured against this fixed baseline.
pub const BASELINE_ROAS: Decimal = Decimal::ONE;

/// Headline numbers for the current selection. Amounts serialize as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    /// Revenue of the filtered tracking rows.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Spend over every payout; attribute filters never apply to spend.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
    /// `total_revenue / total_spend`, or zero when nothing was spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub roas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub incremental_roas: Decimal,
}

impl CampaignSummary {
    pub fn new(total_revenue: Decimal, total_spend: Decimal) -> Self {
        let roas = ratio_or_zero(total_revenue, total_spend);
        Self {
            total_revenue,
            total_spend,
            roas,
            incremental_roas: roas - BASELINE_ROAS,
        }
    }
}

/// One point of the ROAS-over-time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoasPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spend: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub roas: Decimal,
}

/// Revenue of a (gender, category) persona relative to total spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaShare {
    pub gender: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub share: Decimal,
}

/// An influencer's return on what they were paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluencerRoas {
    pub influencer_id: String,
    /// Null when the influencer is not on the roster.
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub payout: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub roas: Decimal,
}

impl InfluencerRoas {
    /// The name to show, falling back to the id for unknown influencers.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.influencer_id)
    }
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub predicate: FilterPredicate,
    pub date_range: Option<DateRange>,
    pub filtered_rows: usize,
    pub summary: CampaignSummary,
    pub time_series: Vec<RoasPoint>,
    pub top_posts: Vec<Post>,
    pub personas: Vec<PersonaShare>,
    pub bottom_influencers: Vec<InfluencerRoas>,
    pub top_influencers: Vec<InfluencerRoas>,
}

/// `numerator / denominator`, with a zero (or negative) denominator yielding zero.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}
