//! Loaders that populate a retail `Dataset`.

pub mod csv_source;
pub mod errors;
pub mod fingerprint;
pub mod options;
pub mod parse;
pub mod postgres;
pub mod redaction;
pub mod source;

pub use csv_source::CsvSource;
pub use errors::{Result, SourceError};
pub use fingerprint::dataset_fingerprint;
pub use options::LoadOptions;
pub use postgres::{PostgresSource, load_postgres};
pub use redaction::{RedactedUrl, redact_database_url};
pub use source::{DatasetSource, LoadWarning, Loaded};

pub use retailscope_core::Dataset;
