use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    /// A table is missing one or more required columns. `missing` is sorted.
    #[error("{table} CSV missing columns: {}", .missing.join(", "))]
    Schema { table: String, missing: Vec<String> },
}

impl CoreError {
    /// Builds a `Schema` error from the required columns absent in `headers`,
    /// or returns `None` when every required column is present.
    pub fn check_columns(table: &str, headers: &[String], required: &[&str]) -> Option<Self> {
        let mut missing: Vec<String> = required
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();

        if missing.is_empty() {
            return None;
        }
        missing.sort();
        Some(CoreError::Schema {
            table: table.to_string(),
            missing,
        })
    }
}
