use analytics::pipeline::{apply_filter, bottom_influencers, enrich, persona_ranking, summary, time_series, top_influencers};
use analytics::{AnalyticsEngine, DashboardSession, FilterOptions, FilterPredicate, RankingSizes, Selection};
use chrono::NaiveDate;
use core_types::{Dataset, Dimension, Influencer, Payout, Tracking, TrackingEvent};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event(id: &str, source: &str, date: NaiveDate, revenue: Decimal) -> TrackingEvent {
    TrackingEvent {
        influencer_id: Some(id.to_string()),
        source: Some(source.to_string()),
        date: Some(date),
        revenue,
        extra: vec![],
    }
}

fn influencer(id: &str, name: &str, gender: &str, category: &str, platform: &str) -> Influencer {
    Influencer {
        id: id.to_string(),
        name: Some(name.to_string()),
        gender: Some(gender.to_string()),
        category: Some(category.to_string()),
        platform: Some(platform.to_string()),
        follower_count: None,
    }
}

fn payout(id: &str, amount: Decimal, date: Option<NaiveDate>) -> Payout {
    Payout {
        influencer_id: Some(id.to_string()),
        total_payout: amount,
        date,
    }
}

fn campaign() -> Dataset {
    Dataset {
        influencers: vec![
            influencer("1", "Asha", "Female", "Fitness", "Instagram"),
            influencer("2", "Ravi", "Male", "Nutrition", "YouTube"),
            influencer("3", "Meera", "Female", "Beauty", "Instagram"),
            influencer("7", "Never Tracked", "Male", "Fitness", "Twitter"),
        ],
        posts: vec![],
        tracking: Tracking {
            columns: ["influencer_id", "source", "date", "revenue"].map(String::from).to_vec(),
            events: vec![
                event("1", "MuscleBlaze", ymd(2024, 1, 1), dec!(1200)),
                event("2", "HKVitals", ymd(2024, 1, 1), dec!(300)),
                event("2", "MuscleBlaze", ymd(2024, 1, 2), dec!(500)),
                event("3", "Gritzo", ymd(2024, 1, 3), dec!(900)),
                event("5", "Gritzo", ymd(2024, 1, 3), dec!(50)),
            ],
        },
        payouts: vec![
            payout("1", dec!(400), Some(ymd(2024, 1, 1))),
            payout("2", dec!(800), Some(ymd(2024, 1, 2))),
            payout("3", dec!(300), None),
            payout("7", dec!(100), None),
        ],
    }
}

#[test]
fn single_conversion_example() {
    let tracking = vec![event("1", "A", ymd(2024, 1, 1), dec!(1000))];
    let payouts = vec![payout("1", dec!(500), None)];

    let enriched = enrich(&tracking, &[]);
    let s = summary(&enriched, &payouts);

    assert_eq!(s.total_revenue, dec!(1000));
    assert_eq!(s.total_spend, dec!(500));
    assert_eq!(s.roas, dec!(2));
    assert_eq!(s.incremental_roas, dec!(1));
}

#[test]
fn empty_payouts_give_zero_roas_not_infinity() {
    let tracking = vec![event("1", "A", ymd(2024, 1, 1), dec!(1000))];
    let s = summary(&enrich(&tracking, &[]), &[]);

    assert_eq!(s.total_spend, Decimal::ZERO);
    assert_eq!(s.roas, Decimal::ZERO);
    assert_eq!(s.incremental_roas, dec!(-1));
}

#[test]
fn spend_is_invariant_under_attribute_filters() {
    let data = campaign();
    let enriched = enrich(&data.tracking.events, &data.influencers);
    let baseline = summary(&enriched, &data.payouts).total_spend;

    let predicates = [
        FilterPredicate::all(),
        FilterOptions::observe(&enriched).default_predicate(),
        FilterPredicate::all().with(Dimension::Platform, Selection::only(["YouTube"])),
        FilterPredicate::all().with(Dimension::Gender, Selection::only(["Female"])),
        FilterPredicate::all().with(Dimension::Source, Selection::only(["nothing-matches"])),
    ];
    for predicate in &predicates {
        let filtered = apply_filter(&enriched, predicate);
        let s = summary(&filtered, &data.payouts);
        assert_eq!(s.total_spend, baseline);
        assert_eq!(s.total_spend, dec!(1600));
        assert_eq!(s.incremental_roas, s.roas - Decimal::ONE);
    }
}

#[test]
fn default_filter_drops_rows_without_roster_match() {
    let data = campaign();
    let enriched = enrich(&data.tracking.events, &data.influencers);
    let filtered = apply_filter(&enriched, &FilterOptions::observe(&enriched).default_predicate());

    // Influencer 5 is not on the roster, so its null platform fails the default selection.
    assert_eq!(enriched.len(), 5);
    assert_eq!(filtered.len(), 4);
    assert_eq!(summary(&filtered, &data.payouts).total_revenue, dec!(2900));
}

#[test]
fn time_series_is_non_negative_and_zero_without_spend() {
    let data = campaign();
    let series = time_series(&data.tracking.events, &data.payouts, None);

    assert!(series.iter().all(|p| p.roas >= Decimal::ZERO));
    let by_date: Vec<(NaiveDate, Decimal)> = series.iter().map(|p| (p.date, p.roas)).collect();
    assert_eq!(
        by_date,
        vec![
            (ymd(2024, 1, 1), dec!(3.75)),
            (ymd(2024, 1, 2), dec!(0.625)),
            (ymd(2024, 1, 3), Decimal::ZERO),
        ]
    );
}

#[test]
fn persona_shares_sum_to_revenue_over_spend() {
    let data = campaign();
    let enriched = enrich(&data.tracking.events, &data.influencers);
    let filtered = apply_filter(&enriched, &FilterOptions::observe(&enriched).default_predicate());
    let s = summary(&filtered, &data.payouts);

    let personas = persona_ranking(&filtered, s.total_spend);
    let total_share: Decimal = personas.iter().map(|p| p.share).sum();

    assert_eq!(total_share, s.total_revenue / s.total_spend);
    assert_ne!(total_share, Decimal::ONE);
}

#[test]
fn rankings_skip_untracked_and_unpaid_influencers() {
    let data = campaign();
    let enriched = enrich(&data.tracking.events, &data.influencers);

    let top = top_influencers(&enriched, &data.payouts, &data.influencers, 10);
    let bottom = bottom_influencers(&enriched, &data.payouts, &data.influencers, 5);

    for rows in [&top, &bottom] {
        // 7 is on the roster and paid but never tracked; 5 is tracked but never paid.
        assert!(rows.iter().all(|r| r.influencer_id != "7" && r.influencer_id != "5"));
        assert_eq!(rows.len(), 3);
    }
    let names: Vec<&str> = top.iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Asha", "Meera", "Ravi"]);
    assert_eq!(top[0].roas, dec!(3));
    assert_eq!(bottom[0].influencer_id, "2");
}

#[test]
fn session_recomputes_on_filter_change_and_reset() {
    let engine = AnalyticsEngine::new(RankingSizes {
        bottom_influencers: 5,
        top_influencers: 2,
        top_posts: 10,
    });
    let mut session = DashboardSession::new(campaign(), engine);

    assert_eq!(session.date_range().map(|r| (r.start, r.end)), Some((ymd(2024, 1, 1), ymd(2024, 1, 3))));
    let initial = session.view();
    assert_eq!(initial.filtered_rows, 4);
    assert_eq!(initial.top_influencers.len(), 2);

    session.select(Dimension::Platform, ["YouTube"]);
    let youtube = session.view();
    assert_eq!(youtube.filtered_rows, 2);
    assert_eq!(youtube.summary.total_revenue, dec!(800));
    assert_eq!(youtube.summary.total_spend, initial.summary.total_spend);
    // The time series ignores attribute filters.
    assert_eq!(youtube.time_series, initial.time_series);

    session.set_date_range(Some(ymd(2024, 1, 2)), None).unwrap();
    let narrowed = session.view();
    assert_eq!(narrowed.time_series.first().map(|p| p.date), Some(ymd(2024, 1, 2)));

    assert!(session.set_date_range(Some(ymd(2024, 2, 1)), Some(ymd(2024, 1, 1))).is_err());

    session.reset();
    assert_eq!(session.view(), initial);
}
