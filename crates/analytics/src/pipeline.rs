//! The ROI aggregation pipeline as explicit relational passes over record slices.

use crate::filter::{DateRange, FilterPredicate};
use crate::report::{ratio_or_zero, CampaignSummary, InfluencerRoas, PersonaShare, RoasPoint};
use chrono::NaiveDate;
use core_types::{EnrichedEvent, Influencer, Payout, Post, TrackingEvent};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Indexes the roster by id. The first row wins when an id repeats, so a
/// join never fans out.
fn roster_index(influencers: &[Influencer]) -> HashMap<&str, &Influencer> {
    let mut index = HashMap::with_capacity(influencers.len());
    for influencer in influencers {
        index.entry(influencer.id.as_str()).or_insert(influencer);
    }
    index
}

/// Left-joins tracking onto the roster. Every tracking row is kept; rows
/// without a roster match carry null demographics.
pub fn enrich(tracking: &[TrackingEvent], influencers: &[Influencer]) -> Vec<EnrichedEvent> {
    let roster = roster_index(influencers);
    tracking
        .iter()
        .map(|event| {
            let matched = event
                .influencer_id
                .as_deref()
                .and_then(|id| roster.get(id).copied());
            EnrichedEvent {
                event: event.clone(),
                gender: matched.and_then(|i| i.gender.clone()),
                category: matched.and_then(|i| i.category.clone()),
                platform: matched.and_then(|i| i.platform.clone()),
            }
        })
        .collect()
}

pub fn apply_filter(rows: &[EnrichedEvent], predicate: &FilterPredicate) -> Vec<EnrichedEvent> {
    rows.iter().filter(|r| predicate.matches(r)).cloned().collect()
}

/// Revenue comes from the filtered rows, spend from every payout.
pub fn summary(filtered: &[EnrichedEvent], payouts: &[Payout]) -> CampaignSummary {
    let total_revenue: Decimal = filtered.iter().map(|r| r.event.revenue).sum();
    let total_spend: Decimal = payouts.iter().map(|p| p.total_payout).sum();
    CampaignSummary::new(total_revenue, total_spend)
}

/// Daily ROAS over the raw tracking and payout tables.
///
/// Each side is restricted to the range independently (`None` keeps every
/// dated row) and summed per date. The series covers the union of dates; a
/// date without spend has ROAS zero.
pub fn time_series(
    tracking: &[TrackingEvent],
    payouts: &[Payout],
    range: Option<DateRange>,
) -> Vec<RoasPoint> {
    let in_range = |date: Option<NaiveDate>| match range {
        Some(r) => r.contains(date),
        None => date.is_some(),
    };

    let mut revenue: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for event in tracking.iter().filter(|e| in_range(e.date)) {
        if let Some(date) = event.date {
            *revenue.entry(date).or_default() += event.revenue;
        }
    }

    let mut spend: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for payout in payouts.iter().filter(|p| in_range(p.date)) {
        if let Some(date) = payout.date {
            *spend.entry(date).or_default() += payout.total_payout;
        }
    }

    let dates: BTreeSet<NaiveDate> = revenue.keys().chain(spend.keys()).copied().collect();
    dates
        .into_iter()
        .map(|date| {
            let revenue = revenue.get(&date).copied().unwrap_or_default();
            let spend = spend.get(&date).copied().unwrap_or_default();
            RoasPoint {
                date,
                revenue,
                spend,
                roas: ratio_or_zero(revenue, spend),
            }
        })
        .collect()
}

/// Revenue share of total spend per (gender, category), highest first.
///
/// Rows with a null gender or category belong to no persona. Ties keep
/// ascending persona order.
pub fn persona_ranking(filtered: &[EnrichedEvent], total_spend: Decimal) -> Vec<PersonaShare> {
    let mut groups: BTreeMap<(&str, &str), Decimal> = BTreeMap::new();
    for row in filtered {
        if let (Some(gender), Some(category)) = (row.gender.as_deref(), row.category.as_deref()) {
            *groups.entry((gender, category)).or_default() += row.event.revenue;
        }
    }

    let mut personas: Vec<PersonaShare> = groups
        .into_iter()
        .map(|((gender, category), revenue)| PersonaShare {
            gender: gender.to_string(),
            category: category.to_string(),
            revenue,
            share: ratio_or_zero(revenue, total_spend),
        })
        .collect();
    personas.sort_by(|a, b| b.share.cmp(&a.share));
    personas
}

/// Orders ids numerically when both are integers, lexically otherwise.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Per-influencer ROAS for every influencer in the filtered rows whose ROAS
/// is defined, in ascending id order.
///
/// ROAS is undefined when the influencer has no payout row or was paid
/// nothing; those influencers are left out rather than ranked.
fn influencer_roas(
    filtered: &[EnrichedEvent],
    payouts: &[Payout],
    influencers: &[Influencer],
) -> Vec<InfluencerRoas> {
    let mut revenue: HashMap<&str, Decimal> = HashMap::new();
    for row in filtered {
        if let Some(id) = row.event.influencer_id.as_deref() {
            *revenue.entry(id).or_default() += row.event.revenue;
        }
    }

    let mut paid: HashMap<&str, Decimal> = HashMap::new();
    for payout in payouts {
        if let Some(id) = payout.influencer_id.as_deref() {
            *paid.entry(id).or_default() += payout.total_payout;
        }
    }

    let roster = roster_index(influencers);
    let mut ids: Vec<&str> = revenue.keys().copied().collect();
    ids.sort_by(|a, b| compare_ids(a, b));

    let mut undefined = 0usize;
    let rows: Vec<InfluencerRoas> = ids
        .into_iter()
        .filter_map(|id| {
            let revenue = revenue[id];
            let payout = paid.get(id).copied().filter(|p| !p.is_zero());
            let Some(roas) = payout.and_then(|p| revenue.checked_div(p)) else {
                undefined += 1;
                return None;
            };
            Some(InfluencerRoas {
                influencer_id: id.to_string(),
                name: roster.get(id).and_then(|i| i.name.clone()),
                revenue,
                payout: payout.unwrap_or_default(),
                roas,
            })
        })
        .collect();

    if undefined > 0 {
        tracing::debug!(influencers = undefined, "Excluded from rankings: no payout to divide by.");
    }
    rows
}

/// The `n` lowest-ROAS influencers, ascending.
pub fn bottom_influencers(
    filtered: &[EnrichedEvent],
    payouts: &[Payout],
    influencers: &[Influencer],
    n: usize,
) -> Vec<InfluencerRoas> {
    let mut rows = influencer_roas(filtered, payouts, influencers);
    rows.sort_by(|a, b| a.roas.cmp(&b.roas));
    rows.truncate(n);
    rows
}

/// The `n` highest-ROAS influencers, descending.
pub fn top_influencers(
    filtered: &[EnrichedEvent],
    payouts: &[Payout],
    influencers: &[Influencer],
    n: usize,
) -> Vec<InfluencerRoas> {
    let mut rows = influencer_roas(filtered, payouts, influencers);
    rows.sort_by(|a, b| b.roas.cmp(&a.roas));
    rows.truncate(n);
    rows
}

/// The `n` posts with the highest reach.
pub fn top_posts(posts: &[Post], n: usize) -> Vec<Post> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| b.reach.cmp(&a.reach));
    ranked.into_iter().take(n).cloned().collect()
}
