use thiserror::Error;

/// Errors surfaced by the loaders and the report engine.
///
/// Every variant is recoverable at the CLI boundary: the front end prints
/// the message and returns to the prompt loop.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("column {column}, row {row}: cannot read {value:?} as a number")]
    DataFormat {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("no schedules left after filtering, nothing to report")]
    EmptyDataset,

    #[error("failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to write summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn missing_column(name: &str) -> Self {
        ReportError::MissingInput(format!("required column '{name}' not found in input"))
    }
}
