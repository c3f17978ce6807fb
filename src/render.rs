//! Terminal rendering of the dashboard with comfy-table.

use analytics::{
    CampaignSummary, DashboardView, DateRange, FilterOptions, FilterPredicate, InfluencerRoas, PersonaShare,
    RoasPoint, Selection,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{Dimension, Post};
use exporter::{format_money, format_ratio};

const EMPTY: &str = "-";

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().copied());
    table
}

fn right(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or(EMPTY)
}

/// Prints every section of the dashboard.
pub fn print_dashboard(view: &DashboardView, currency: &str) {
    println!("Filters: {}", describe_predicate(&view.predicate));
    println!("Date range: {}", describe_range(view.date_range));
    println!("Filtered tracking rows: {}\n", view.filtered_rows);

    section("Campaign Summary", summary_table(&view.summary, currency));
    section("ROAS Over Time", time_series_table(&view.time_series, currency));
    section("Top Posts by Reach", posts_table(&view.top_posts));
    section("Best Performing Personas", persona_table(&view.personas, currency));
    section("Poor ROI Influencers", influencer_table(&view.bottom_influencers, currency));
    section("Top Influencers by ROAS", influencer_table(&view.top_influencers, currency));
}

/// Prints only the headline numbers.
pub fn print_summary(summary: &CampaignSummary, filtered_rows: usize, currency: &str) {
    println!("Filtered tracking rows: {filtered_rows}");
    println!("{}", summary_table(summary, currency));
}

/// Prints the observed values of each dimension and the default date range.
pub fn print_options(options: &FilterOptions, observed: Option<DateRange>) {
    let mut table = new_table(&["Dimension", "Values"]);
    for dimension in Dimension::ALL {
        let values = options.values(dimension);
        let listed = if values.is_empty() {
            "(none observed)".to_string()
        } else {
            values.join(", ")
        };
        table.add_row(vec![Cell::new(dimension.to_string()), Cell::new(listed)]);
    }
    println!("{table}");
    println!("Default date range: {}", describe_range(observed));
}

fn section(title: &str, table: Table) {
    println!("{title}");
    println!("{table}\n");
}

fn summary_table(summary: &CampaignSummary, currency: &str) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table
        .add_row(vec![
            Cell::new("Total Revenue"),
            right(format_money(summary.total_revenue, currency)),
        ])
        .add_row(vec![
            Cell::new("Total Spend"),
            right(format_money(summary.total_spend, currency)),
        ])
        .add_row(vec![Cell::new("ROAS"), right(format_ratio(summary.roas))])
        .add_row(vec![
            Cell::new("Incremental ROAS"),
            right(format_ratio(summary.incremental_roas)),
        ]);
    table
}

fn time_series_table(points: &[RoasPoint], currency: &str) -> Table {
    let mut table = new_table(&["Date", "Revenue", "Spend", "ROAS"]);
    for point in points {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            right(format_money(point.revenue, currency)),
            right(format_money(point.spend, currency)),
            right(format_ratio(point.roas)),
        ]);
    }
    table
}

fn posts_table(posts: &[Post]) -> Table {
    let mut table = new_table(&["Influencer", "Platform", "Date", "Reach", "URL"]);
    for post in posts {
        let date = post.date.map(|d| d.to_string());
        table.add_row(vec![
            Cell::new(or_empty(post.influencer_id.as_deref())),
            Cell::new(or_empty(post.platform.as_deref())),
            Cell::new(or_empty(date.as_deref())),
            right(post.reach.to_string()),
            Cell::new(&post.url),
        ]);
    }
    table
}

fn persona_table(personas: &[PersonaShare], currency: &str) -> Table {
    let mut table = new_table(&["Gender", "Category", "Revenue", "Share of Spend"]);
    for persona in personas {
        table.add_row(vec![
            Cell::new(&persona.gender),
            Cell::new(&persona.category),
            right(format_money(persona.revenue, currency)),
            right(format_ratio(persona.share)),
        ]);
    }
    table
}

fn influencer_table(rows: &[InfluencerRoas], currency: &str) -> Table {
    let mut table = new_table(&["Influencer", "Revenue", "Payout", "ROAS"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.display_name()),
            right(format_money(row.revenue, currency)),
            right(format_money(row.payout, currency)),
            right(format_ratio(row.roas)),
        ]);
    }
    table
}

pub fn describe_predicate(predicate: &FilterPredicate) -> String {
    let parts: Vec<String> = Dimension::ALL
        .into_iter()
        .filter_map(|dimension| match predicate.selection(dimension) {
            Selection::All => None,
            Selection::Only(values) => {
                let listed: Vec<&str> = values.iter().map(String::as_str).collect();
                Some(format!("{dimension} in [{}]", listed.join(", ")))
            }
        })
        .collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join("; ")
    }
}

pub fn describe_range(range: Option<DateRange>) -> String {
    match range {
        Some(range) => format!("{} to {}", range.start, range.end),
        None => "no dated tracking rows".to_string(),
    }
}
