use crate::error::ExportError;
use core_types::EnrichedEvent;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Trailing columns of a filtered export: the joined demographics. The
/// tracking columns come first, in the order of the tracking file.
pub const DEMOGRAPHIC_COLUMNS: &[&str] = &["gender", "category", "platform"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hex SHA-256 over the column names and every cell of `rows`.
///
/// Null cells and empty strings hash differently.
pub fn content_hash(rows: &[EnrichedEvent], columns: &[String]) -> String {
    fn feed(hasher: &mut Sha256, cell: Option<&str>) {
        match cell {
            Some(value) => {
                hasher.update([1u8]);
                hasher.update((value.len() as u64).to_le_bytes());
                hasher.update(value.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }

    let mut hasher = Sha256::new();
    hasher.update((columns.len() as u64).to_le_bytes());
    for column in columns {
        feed(&mut hasher, Some(column.as_str()));
    }
    hasher.update((rows.len() as u64).to_le_bytes());
    for row in rows {
        let e = &row.event;
        feed(&mut hasher, e.influencer_id.as_deref());
        feed(&mut hasher, e.source.as_deref());
        feed(&mut hasher, e.date.map(|d| d.format(DATE_FORMAT).to_string()).as_deref());
        feed(&mut hasher, Some(e.revenue.to_string().as_str()));
        hasher.update((e.extra.len() as u64).to_le_bytes());
        for cell in &e.extra {
            feed(&mut hasher, Some(cell.as_str()));
        }
        feed(&mut hasher, row.gender.as_deref());
        feed(&mut hasher, row.category.as_deref());
        feed(&mut hasher, row.platform.as_deref());
    }
    hex::encode(hasher.finalize())
}

/// Serializes filtered tracking rows to CSV, reusing the previous bytes when
/// the same rows are exported again.
#[derive(Debug, Default)]
pub struct CsvExporter {
    cache: HashMap<String, Arc<[u8]>>,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// UTF-8 CSV with a header row. `columns` is the tracking layout
    /// (`Tracking::columns`); null cells are written empty.
    pub fn export(&mut self, rows: &[EnrichedEvent], columns: &[String]) -> Result<Arc<[u8]>, ExportError> {
        let key = content_hash(rows, columns);
        if let Some(bytes) = self.cache.get(&key) {
            tracing::debug!(hash = %key, "Filtered CSV served from cache.");
            return Ok(Arc::clone(bytes));
        }

        let bytes: Arc<[u8]> = render(rows, columns)?.into();
        tracing::debug!(hash = %key, rows = rows.len(), "Filtered CSV rendered.");
        self.cache.insert(key, Arc::clone(&bytes));
        Ok(bytes)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn render(rows: &[EnrichedEvent], columns: &[String]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = columns
        .iter()
        .map(String::as_str)
        .chain(DEMOGRAPHIC_COLUMNS.iter().copied());
    writer.write_record(header)?;

    for row in rows {
        let e = &row.event;
        // Non-typed columns take the extra cells in order.
        let mut extra = e.extra.iter();
        let tracking = columns.iter().map(|column| match column.as_str() {
            "influencer_id" => e.influencer_id.clone().unwrap_or_default(),
            "source" => e.source.clone().unwrap_or_default(),
            "date" => e.date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            "revenue" => e.revenue.to_string(),
            _ => extra.next().cloned().unwrap_or_default(),
        });
        let record: Vec<String> = tracking
            .chain([&row.gender, &row.category, &row.platform].map(|v| v.clone().unwrap_or_default()))
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| {
            let source = std::io::Error::new(e.error().kind(), e.error().to_string());
            ExportError::Csv(csv::Error::from(source))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TrackingEvent;
    use rust_decimal_macros::dec;

    fn row(id: &str, source: Option<&str>, platform: Option<&str>) -> EnrichedEvent {
        EnrichedEvent {
            event: TrackingEvent {
                influencer_id: Some(id.to_string()),
                source: source.map(str::to_string),
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
                revenue: dec!(10.50),
                extra: vec!["Summer, Sale".to_string()],
            },
            gender: None,
            category: Some("Fitness".to_string()),
            platform: platform.map(str::to_string),
        }
    }

    fn layout(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn header_and_quoting() {
        let mut exporter = CsvExporter::new();
        let columns = layout(&["influencer_id", "source", "date", "revenue", "campaign"]);
        let bytes = exporter.export(&[row("1", Some("A"), None)], &columns).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert_eq!(
            text,
            "influencer_id,source,date,revenue,campaign,gender,category,platform\n\
             1,A,2024-01-01,10.50,\"Summer, Sale\",,Fitness,\n"
        );
    }

    #[test]
    fn tracking_column_order_is_kept() {
        let mut exporter = CsvExporter::new();
        let columns = layout(&["source", "campaign", "influencer_id", "date", "revenue"]);
        let bytes = exporter.export(&[row("7", Some("MB"), Some("YouTube"))], &columns).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert_eq!(
            text,
            "source,campaign,influencer_id,date,revenue,gender,category,platform\n\
             MB,\"Summer, Sale\",7,2024-01-01,10.50,,Fitness,YouTube\n"
        );
    }

    #[test]
    fn repeated_export_hits_the_cache() {
        let mut exporter = CsvExporter::new();
        let rows = vec![row("1", Some("A"), Some("Instagram"))];
        let extra = layout(&["influencer_id", "source", "date", "revenue", "campaign"]);

        let first = exporter.export(&rows, &extra).unwrap();
        let second = exporter.export(&rows, &extra).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(exporter.cached_entries(), 1);

        let other = exporter.export(&[row("2", Some("A"), Some("Instagram"))], &extra).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(exporter.cached_entries(), 2);
    }

    #[test]
    fn hash_distinguishes_null_from_empty() {
        let extra = layout(&["influencer_id", "source", "date", "revenue", "campaign"]);
        let null_source = content_hash(&[row("1", None, None)], &extra);
        let empty_source = content_hash(&[row("1", Some(""), None)], &extra);
        assert_ne!(null_source, empty_source);
        assert_eq!(null_source, content_hash(&[row("1", None, None)], &extra));

        let reordered = layout(&["source", "influencer_id", "date", "revenue", "campaign"]);
        assert_ne!(null_source, content_hash(&[row("1", None, None)], &reordered));
    }
}
