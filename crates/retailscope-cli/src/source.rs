use std::path::PathBuf;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use retailscope_source::{CsvSource, DatasetSource, PostgresSource, redact_database_url};

use crate::CliError;
use crate::registry::RunSource;
use crate::settings::Settings;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PG_SCHEMA: &str = "public";

/// Resolved dataset location for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Csv { data_dir: PathBuf },
    Postgres { url: String, schema: String },
}

impl SourceSpec {
    /// Flags beat the settings file; a database URL beats a data directory
    /// from the same layer.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        database_url: Option<String>,
        pg_schema: Option<String>,
        settings: &Settings,
    ) -> Result<Self, CliError> {
        let schema = pg_schema
            .or_else(|| settings.pg_schema.clone())
            .unwrap_or_else(|| DEFAULT_PG_SCHEMA.to_string());

        let spec = match (database_url, data_dir) {
            (Some(url), _) => SourceSpec::Postgres { url, schema },
            (None, Some(data_dir)) => SourceSpec::Csv { data_dir },
            (None, None) => match (&settings.database_url, &settings.data_dir) {
                (Some(url), _) => SourceSpec::Postgres {
                    url: url.clone(),
                    schema,
                },
                (None, Some(data_dir)) => SourceSpec::Csv {
                    data_dir: data_dir.clone(),
                },
                (None, None) => SourceSpec::Csv {
                    data_dir: PathBuf::from(DEFAULT_DATA_DIR),
                },
            },
        };

        if let SourceSpec::Postgres { url, .. } = &spec {
            detect_engine(url)?;
        }
        Ok(spec)
    }

    /// Redacted description suitable for artifacts and logs.
    pub fn describe(&self) -> RunSource {
        match self {
            SourceSpec::Csv { data_dir } => RunSource::Csv {
                data_dir: data_dir.clone(),
            },
            SourceSpec::Postgres { url, schema } => RunSource::Postgres {
                connection: redact_database_url(url),
                schema: schema.clone(),
            },
        }
    }

    pub async fn open(&self) -> Result<Box<dyn DatasetSource>, CliError> {
        match self {
            SourceSpec::Csv { data_dir } => Ok(Box::new(CsvSource::new(data_dir.clone()))),
            SourceSpec::Postgres { url, schema } => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(10))
                    .connect(url)
                    .await?;
                Ok(Box::new(PostgresSource::new(pool).with_schema(schema.clone())?))
            }
        }
    }
}

fn detect_engine(url: &str) -> Result<&'static str, CliError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(redact_database_url(url).redacted))
    }
}
