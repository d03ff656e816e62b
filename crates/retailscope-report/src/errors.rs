use thiserror::Error;

/// Errors emitted while selecting or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown report: {0}")]
    UnknownReport(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
