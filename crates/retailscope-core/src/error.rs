use thiserror::Error;

/// Core error type shared across retailscope crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset violates its integrity rules.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    /// A table name not present in the catalog.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by retailscope crates.
pub type Result<T> = std::result::Result<T, Error>;
