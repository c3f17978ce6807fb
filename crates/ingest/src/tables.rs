use crate::error::IngestError;
use crate::raw::RawTable;
use core_types::{
    normalize_key, normalize_text, parse_date, CoreError, EnrichedEvent, Influencer, Payout, Post,
    Tracking, TrackingEvent, TRACKING_FIELDS,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

pub const INFLUENCER_COLUMNS: &[&str] = &["id", "gender", "category", "platform", "name"];
pub const POST_COLUMNS: &[&str] = &["reach", "url"];
pub const TRACKING_COLUMNS: &[&str] = &["revenue", "date", "influencer_id"];
pub const PAYOUT_COLUMNS: &[&str] = &["influencer_id", "total_payout"];

/// Columns the join adds; an exported filtered CSV ends with these.
const DEMOGRAPHIC_COLUMNS: &[&str] = &["gender", "category", "platform"];
/// Prefix given to a tracking column that shares a name with a demographic column.
const RENAMED_PREFIX: &str = "tracking_";

/// A filtered tracking export read back from CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTable {
    /// The tracking layout, without the trailing demographic columns.
    pub columns: Vec<String>,
    pub rows: Vec<EnrichedEvent>,
}

fn require(table: &RawTable, required: &[&str]) -> Result<(), IngestError> {
    match CoreError::check_columns(&table.name, &table.headers, required) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Index of a column already checked by `require`.
fn required_column(table: &RawTable, name: &str) -> Result<usize, IngestError> {
    table.column(name).ok_or_else(|| {
        CoreError::Schema {
            table: table.name.clone(),
            missing: vec![name.to_string()],
        }
        .into()
    })
}

fn invalid(table: &RawTable, index: usize, column: &str, value: &str) -> IngestError {
    IngestError::InvalidValue {
        table: table.name.clone(),
        line: RawTable::line_of(index),
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Parses a money cell. Empty cells count as zero; negative amounts are rejected.
fn parse_money(table: &RawTable, index: usize, column: &str, raw: &str) -> Result<Decimal, IngestError> {
    let s = raw.trim();
    if normalize_text(s).is_none() {
        tracing::debug!(table = %table.name, line = RawTable::line_of(index), column, "Empty amount read as 0.");
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .filter(|amount| !amount.is_sign_negative() || amount.is_zero())
        .ok_or_else(|| invalid(table, index, column, raw))
}

/// A non-negative whole number. Integral floats such as `1500.0` are accepted.
fn count_value(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().or_else(|| {
        Decimal::from_str(s)
            .ok()
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_u64())
    })
}

/// Parses a count the dashboard depends on. Unreadable cells are errors.
fn parse_count(table: &RawTable, index: usize, column: &str, raw: &str) -> Result<Option<u64>, IngestError> {
    let s = raw.trim();
    if normalize_text(s).is_none() {
        return Ok(None);
    }
    count_value(s).map(Some).ok_or_else(|| invalid(table, index, column, raw))
}

/// Parses an informational count. Unreadable cells become null and are tallied.
fn lenient_count(table: &RawTable, row: &csv::StringRecord, col: Option<usize>, unreadable: &mut usize) -> Option<u64> {
    let s = table.cell(row, col?).trim();
    normalize_text(s)?;
    let count = count_value(s);
    if count.is_none() {
        *unreadable += 1;
    }
    count
}

fn warn_unreadable_counts(table: &RawTable, unreadable: usize) {
    if unreadable > 0 {
        tracing::warn!(table = %table.name, cells = unreadable, "Unreadable counts treated as unknown.");
    }
}

fn optional_text(table: &RawTable, row: &csv::StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|c| normalize_text(table.cell(row, c)))
}

/// Parses the optional date column, counting cells that were present but unreadable.
fn optional_date(
    table: &RawTable,
    row: &csv::StringRecord,
    col: Option<usize>,
    unparsed: &mut usize,
) -> Option<chrono::NaiveDate> {
    let raw = table.cell(row, col?);
    let date = parse_date(raw);
    if date.is_none() && normalize_text(raw).is_some() {
        *unparsed += 1;
    }
    date
}

fn warn_unparsed_dates(table: &RawTable, unparsed: usize) {
    if unparsed > 0 {
        tracing::warn!(table = %table.name, rows = unparsed, "Unparseable dates treated as unknown.");
    }
}

/// Parses the influencer roster. Rows without an id cannot be joined and are skipped.
pub fn parse_influencers(table: &RawTable) -> Result<Vec<Influencer>, IngestError> {
    require(table, INFLUENCER_COLUMNS)?;
    let id = required_column(table, "id")?;
    let name = table.column("name");
    let gender = table.column("gender");
    let category = table.column("category");
    let platform = table.column("platform");
    let followers = table.column("follower_count");

    let mut unreadable = 0;
    let mut influencers = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let Some(key) = normalize_key(table.cell(row, id)) else {
            tracing::debug!(line = RawTable::line_of(i), "Skipping influencer without id.");
            continue;
        };
        influencers.push(Influencer {
            id: key,
            name: optional_text(table, row, name),
            gender: optional_text(table, row, gender),
            category: optional_text(table, row, category),
            platform: optional_text(table, row, platform),
            follower_count: lenient_count(table, row, followers, &mut unreadable),
        });
    }
    warn_unreadable_counts(table, unreadable);
    Ok(influencers)
}

/// Parses the posts table. A post without a reach value counts as zero reach.
pub fn parse_posts(table: &RawTable) -> Result<Vec<Post>, IngestError> {
    require(table, POST_COLUMNS)?;
    let reach = required_column(table, "reach")?;
    let url = required_column(table, "url")?;
    let influencer_id = table.column("influencer_id");
    let platform = table.column("platform");
    let date = table.column("date");
    let likes = table.column("likes");
    let comments = table.column("comments");

    let mut unparsed = 0;
    let mut unreadable = 0;
    let mut posts = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        posts.push(Post {
            url: table.cell(row, url).trim().to_string(),
            reach: parse_count(table, i, "reach", table.cell(row, reach))?.unwrap_or(0),
            influencer_id: influencer_id.and_then(|c| normalize_key(table.cell(row, c))),
            platform: optional_text(table, row, platform),
            date: optional_date(table, row, date, &mut unparsed),
            likes: lenient_count(table, row, likes, &mut unreadable),
            comments: lenient_count(table, row, comments, &mut unreadable),
        });
    }
    warn_unparsed_dates(table, unparsed);
    warn_unreadable_counts(table, unreadable);
    Ok(posts)
}

/// Parses the tracking table, carrying every unknown column through verbatim.
///
/// A tracking column named like a roster demographic (`platform`, say) is
/// renamed `tracking_platform`, so it cannot be confused with the joined value.
pub fn parse_tracking(table: &RawTable) -> Result<Tracking, IngestError> {
    let (columns, events) = parse_tracking_excluding(table, &[])?;
    Ok(Tracking { columns, events })
}

/// The tracking layout as (source index, column name), skipping `excluded`.
fn tracking_layout(table: &RawTable, excluded: &[&str]) -> Vec<(usize, String)> {
    let mut layout: Vec<(usize, String)> = Vec::with_capacity(table.headers.len());
    for (i, header) in table.headers.iter().enumerate() {
        if excluded.contains(&header.as_str()) {
            continue;
        }
        let mut name = header.clone();
        if DEMOGRAPHIC_COLUMNS.contains(&header.as_str()) {
            while table.headers.contains(&name) || layout.iter().any(|(_, n)| *n == name) {
                name = format!("{RENAMED_PREFIX}{name}");
            }
            tracing::warn!(
                table = %table.name,
                column = %header,
                renamed = %name,
                "Tracking column clashes with a roster column; renamed."
            );
        }
        layout.push((i, name));
    }
    layout
}

fn parse_tracking_excluding(
    table: &RawTable,
    excluded: &[&str],
) -> Result<(Vec<String>, Vec<TrackingEvent>), IngestError> {
    require(table, TRACKING_COLUMNS)?;
    let influencer_id = required_column(table, "influencer_id")?;
    let date = required_column(table, "date")?;
    let revenue = required_column(table, "revenue")?;
    let source = table.column("source");
    if source.is_none() {
        tracing::warn!(table = %table.name, "No 'source' column; brand filtering is unavailable.");
    }

    let layout = tracking_layout(table, excluded);
    let extra: Vec<usize> = layout
        .iter()
        .filter(|(_, name)| !TRACKING_FIELDS.contains(&name.as_str()))
        .map(|(i, _)| *i)
        .collect();

    let mut unparsed = 0;
    let mut events = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        events.push(TrackingEvent {
            influencer_id: normalize_key(table.cell(row, influencer_id)),
            source: optional_text(table, row, source),
            date: optional_date(table, row, Some(date), &mut unparsed),
            revenue: parse_money(table, i, "revenue", table.cell(row, revenue))?,
            extra: extra.iter().map(|c| table.cell(row, *c).to_string()).collect(),
        });
    }
    warn_unparsed_dates(table, unparsed);

    Ok((layout.into_iter().map(|(_, name)| name).collect(), events))
}

/// Parses the payouts table. Without a `date` column every payout date is unknown.
pub fn parse_payouts(table: &RawTable) -> Result<Vec<Payout>, IngestError> {
    require(table, PAYOUT_COLUMNS)?;
    let influencer_id = required_column(table, "influencer_id")?;
    let total_payout = required_column(table, "total_payout")?;
    let date = table.column("date");
    if date.is_none() {
        tracing::debug!(table = %table.name, "No 'date' column; payout dates treated as unknown.");
    }

    let mut unparsed = 0;
    let mut payouts = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        payouts.push(Payout {
            influencer_id: normalize_key(table.cell(row, influencer_id)),
            total_payout: parse_money(table, i, "total_payout", table.cell(row, total_payout))?,
            date: optional_date(table, row, date, &mut unparsed),
        });
    }
    warn_unparsed_dates(table, unparsed);
    Ok(payouts)
}

/// Reads a filtered tracking export (tracking columns followed by the joined
/// demographics) back into enriched rows.
pub fn parse_enriched<R: Read>(reader: R) -> Result<EnrichedTable, IngestError> {
    let table = RawTable::from_reader("Filtered", reader)?;
    let (columns, events) = parse_tracking_excluding(&table, DEMOGRAPHIC_COLUMNS)?;

    let gender = table.column("gender");
    let category = table.column("category");
    let platform = table.column("platform");

    let rows = events
        .into_iter()
        .zip(table.rows.iter())
        .map(|(event, row)| EnrichedEvent {
            event,
            gender: optional_text(&table, row, gender),
            category: optional_text(&table, row, category),
            platform: optional_text(&table, row, platform),
        })
        .collect();

    Ok(EnrichedTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn table(name: &str, data: &str) -> RawTable {
        RawTable::from_reader(name, data.as_bytes()).unwrap()
    }

    #[test]
    fn tracking_missing_columns_is_a_schema_error() {
        let t = table("Tracking", "influencer_id,source\n1,A\n");
        let err = parse_tracking(&t).unwrap_err();
        match err {
            IngestError::Schema(CoreError::Schema { table, missing }) => {
                assert_eq!(table, "Tracking");
                assert_eq!(missing, vec!["date", "revenue"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tracking_keeps_extra_columns_in_order() {
        let t = table(
            "Tracking",
            "source,campaign,influencer_id,user_id,date,orders,revenue\nMuscleBlaze,Summer,1,u9,2024-01-02,2,1500.50\n",
        );
        let tracking = parse_tracking(&t).unwrap();

        assert_eq!(tracking.extra_columns(), vec!["campaign", "user_id", "orders"]);
        assert_eq!(
            tracking.columns,
            vec!["source", "campaign", "influencer_id", "user_id", "date", "orders", "revenue"]
        );
        let event = &tracking.events[0];
        assert_eq!(event.influencer_id.as_deref(), Some("1"));
        assert_eq!(event.source.as_deref(), Some("MuscleBlaze"));
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(event.revenue, dec!(1500.50));
        assert_eq!(event.extra, vec!["Summer", "u9", "2"]);
    }

    #[test]
    fn unparseable_dates_become_null() {
        let t = table("Tracking", "influencer_id,date,revenue\n1,not-a-date,10\n2,,20\n");
        let tracking = parse_tracking(&t).unwrap();
        assert!(tracking.events.iter().all(|e| e.date.is_none()));
        assert_eq!(tracking.events[1].revenue, dec!(20));
    }

    #[test]
    fn non_numeric_revenue_is_rejected_with_location() {
        let t = table("Tracking", "influencer_id,date,revenue\n1,2024-01-01,10\n2,2024-01-01,lots\n");
        let err = parse_tracking(&t).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tracking CSV line 3: column 'revenue' has invalid value 'lots'"
        );
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let t = table("Tracking", "influencer_id,date,revenue\n1,2024-01-01,-500\n");
        let err = parse_tracking(&t).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tracking CSV line 2: column 'revenue' has invalid value '-500'"
        );

        let t = table("Payouts", "influencer_id,total_payout\n1,100\n2,-0.01\n");
        match parse_payouts(&t).unwrap_err() {
            IngestError::InvalidValue { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "total_payout");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tracking_column_named_like_a_demographic_is_renamed() {
        let t = table(
            "Tracking",
            "source,influencer_id,platform,date,revenue\nMB,1,Instagram,2024-01-01,100\n",
        );
        let tracking = parse_tracking(&t).unwrap();

        assert_eq!(
            tracking.columns,
            vec!["source", "influencer_id", "tracking_platform", "date", "revenue"]
        );
        assert_eq!(tracking.extra_columns(), vec!["tracking_platform"]);
        assert_eq!(tracking.events[0].extra, vec!["Instagram"]);
    }

    #[test]
    fn payouts_without_date_column_degrade_to_null_dates() {
        let t = table("Payouts", "influencer_id,basis,total_payout\n1.0,post,500\n2,order,\n");
        let payouts = parse_payouts(&t).unwrap();

        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0].influencer_id.as_deref(), Some("1"));
        assert_eq!(payouts[0].total_payout, dec!(500));
        assert_eq!(payouts[1].total_payout, Decimal::ZERO);
        assert!(payouts.iter().all(|p| p.date.is_none()));
    }

    #[test]
    fn influencers_require_the_roster_columns() {
        let t = table("Influencers", "id,name\n1,Asha\n");
        let err = parse_influencers(&t).unwrap_err();
        assert!(err.to_string().contains("category, gender, platform"));
    }

    #[test]
    fn influencers_skip_rows_without_id() {
        let t = table(
            "Influencers",
            "id,name,category,gender,follower_count,platform\n1,Asha,Fitness,Female,12000,Instagram\n,Ghost,Fitness,Male,1,YouTube\n",
        );
        let roster = parse_influencers(&t).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].follower_count, Some(12000));
        assert_eq!(roster[0].platform.as_deref(), Some("Instagram"));
    }

    #[test]
    fn unreadable_informational_counts_become_null() {
        let t = table(
            "Influencers",
            "id,name,category,gender,follower_count,platform\n1,Asha,Fitness,Female,12.5K,Instagram\n",
        );
        let roster = parse_influencers(&t).unwrap();
        assert_eq!(roster[0].follower_count, None);

        let t = table("Posts", "url,reach,likes,comments\nhttps://p/1,900,lots,-3\n");
        let posts = parse_posts(&t).unwrap();
        assert_eq!(posts[0].reach, 900);
        assert_eq!(posts[0].likes, None);
        assert_eq!(posts[0].comments, None);
    }

    #[test]
    fn unreadable_reach_is_still_rejected() {
        let t = table("Posts", "url,reach\nhttps://p/1,12.5K\n");
        assert!(matches!(
            parse_posts(&t).unwrap_err(),
            IngestError::InvalidValue { ref column, .. } if column == "reach"
        ));
    }

    #[test]
    fn posts_accept_float_counts() {
        let t = table(
            "Posts",
            "influencer_id,platform,date,url,caption,reach,likes,comments\n3,Instagram,2024-02-01,https://p/1,hi,1500.0,20,\n",
        );
        let posts = parse_posts(&t).unwrap();
        assert_eq!(posts[0].reach, 1500);
        assert_eq!(posts[0].likes, Some(20));
        assert_eq!(posts[0].comments, None);
        assert_eq!(posts[0].influencer_id.as_deref(), Some("3"));
    }

    #[test]
    fn enriched_export_reads_back_demographics() {
        let data = "influencer_id,source,date,revenue,campaign,gender,category,platform\n1,A,2024-01-01,10,C1,Female,Fitness,Instagram\n9,B,,5,C2,,,\n";
        let table = parse_enriched(data.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["influencer_id", "source", "date", "revenue", "campaign"]);
        assert_eq!(table.rows[0].gender.as_deref(), Some("Female"));
        assert_eq!(table.rows[0].event.extra, vec!["C1"]);
        assert_eq!(table.rows[1].platform, None);
        assert_eq!(table.rows[1].event.date, None);
    }
}
