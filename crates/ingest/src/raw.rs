use crate::error::IngestError;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// A CSV file as read from disk: normalized headers and untyped rows.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    /// Lowercased, trimmed header names.
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Reads a CSV with a header row. Short rows are accepted and their
    /// missing trailing cells read as empty.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self, IngestError> {
        let csv_err = |source: csv::Error| IngestError::Csv {
            table: name.to_string(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(normalize_header)
            .collect();

        let rows = rdr
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Position of a (normalized) column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A cell by row and column index; absent cells read as empty.
    pub fn cell<'a>(&self, row: &'a StringRecord, col: usize) -> &'a str {
        row.get(col).unwrap_or("")
    }

    /// The 1-based line of a row in the source file, counting the header.
    pub fn line_of(index: usize) -> usize {
        index + 2
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}
