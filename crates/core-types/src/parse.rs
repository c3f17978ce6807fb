//! Value normalization shared by ingestion, joining and export.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a calendar date permissively, dropping any time-of-day component.
///
/// Ambiguous numeric forms such as `01/02/2024` are read month-first.
/// Returns `None` for empty or unrecognized input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Trims a free-text cell. Empty cells (and pandas-style `nan`) are null.
pub fn normalize_text(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(s.to_string())
    }
}

/// Canonicalizes a join key: trimmed, and integral floats such as `7.0`
/// collapsed to `7` so ids written by different tools still match.
pub fn normalize_key(raw: &str) -> Option<String> {
    let s = normalize_text(raw)?;
    if let Some((int, frac)) = s.split_once('.') {
        let int_ok = !int.is_empty() && int.chars().all(|c| c.is_ascii_digit());
        let frac_ok = frac.chars().all(|c| c == '0');
        if int_ok && frac_ok {
            return Some(int.to_string());
        }
    }
    Some(s)
}
