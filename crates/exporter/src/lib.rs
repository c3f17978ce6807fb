//! # Report Exporter
//!
//! Serializes a dashboard selection into the two downloadable artifacts: the
//! filtered tracking CSV and the one-page Insights PDF.
//!
//! - `CsvExporter`: filtered CSV, memoized by the content hash of the rows.
//! - `InsightsPdf`: the summary page.
//! - `format_money` / `format_ratio`: the number formats shared with the CLI.
//! - `write_artifact`: writes an export into the output directory.

pub mod csv_export;
pub mod error;
pub mod format;
pub mod pdf;

pub use csv_export::{content_hash, CsvExporter, DEMOGRAPHIC_COLUMNS};
pub use error::ExportError;
pub use format::{format_money, format_ratio};
pub use pdf::{InsightsPdf, PdfLine};

use std::path::{Path, PathBuf};

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed.
pub fn write_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ExportError::Io { path, source }
    };

    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(io_err(&path))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written.");
    Ok(path)
}
