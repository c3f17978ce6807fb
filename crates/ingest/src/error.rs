use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Please provide all 4 required CSV files. Missing: {}", .0.join(", "))]
    MissingInputs(Vec<String>),

    #[error(transparent)]
    Schema(#[from] CoreError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("{table} CSV line {line}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        table: String,
        line: usize,
        column: String,
        value: String,
    },
}
