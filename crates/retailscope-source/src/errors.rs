use thiserror::Error;

/// Errors emitted while loading a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("dataset file not found for table '{table}': {path}")]
    MissingFile { table: String, path: String },
    #[error("table '{table}' is missing columns: {columns}")]
    MissingColumns { table: String, columns: String },
    #[error("invalid value at {table}.{column} row {row}: {message}")]
    InvalidValue {
        table: String,
        column: String,
        row: u64,
        message: String,
    },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("core error: {0}")]
    Core(#[from] retailscope_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, SourceError>;
