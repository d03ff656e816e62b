use async_trait::async_trait;
use sqlx::PgPool;

use retailscope_core::{Dataset, RepairStatus};

use crate::errors::{Result, SourceError};
use crate::source::{DatasetSource, Loaded};

mod queries;

/// Source reading the five tables from a PostgreSQL schema.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
    schema: String,
}

impl PostgresSource {
    /// Create a source using a pre-configured pool and the `public` schema.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: "public".to_string(),
        }
    }

    /// Read from a different schema (plain identifiers only).
    pub fn with_schema(mut self, schema: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        validate_identifier(&schema)?;
        self.schema = schema;
        Ok(self)
    }
}

#[async_trait]
impl DatasetSource for PostgresSource {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self) -> Result<Loaded> {
        let dataset = load_postgres(&self.pool, &self.schema).await?;
        Ok(Loaded {
            dataset,
            warnings: Vec::new(),
        })
    }
}

/// Read all five tables inside one read-only, repeatable-read transaction so
/// the snapshot is consistent even while writers are active.
pub async fn load_postgres(pool: &PgPool, schema: &str) -> Result<Dataset> {
    validate_identifier(schema)?;

    let mut tx = pool.begin().await?;
    sqlx::query("set transaction isolation level repeatable read, read only")
        .execute(&mut *tx)
        .await?;

    let stores = queries::fetch_stores(&mut tx, schema).await?;
    let categories = queries::fetch_categories(&mut tx, schema).await?;
    let products = queries::fetch_products(&mut tx, schema).await?;
    let sales = queries::fetch_sales(&mut tx, schema).await?;
    let claims = queries::fetch_claims(&mut tx, schema).await?;

    tx.commit().await?;

    tracing::debug!(
        event = "postgres_snapshot_loaded",
        schema = schema,
        stores = stores.len(),
        sales = sales.len(),
        claims = claims.len()
    );

    Ok(Dataset::new(
        stores.into_iter().map(Into::into).collect(),
        categories.into_iter().map(Into::into).collect(),
        products.into_iter().map(Into::into).collect(),
        sales.into_iter().map(Into::into).collect(),
        claims
            .into_iter()
            .map(|row| retailscope_core::WarrantyClaim {
                claim_id: row.claim_id,
                claim_date: row.claim_date,
                sale_id: row.sale_id,
                repair_status: RepairStatus::from(row.repair_status),
            })
            .collect(),
    ))
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !name.starts_with(|ch: char| ch.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidOption(format!(
            "invalid schema identifier '{name}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_reject_injection() {
        assert!(validate_identifier("retail_2024").is_ok());
        assert!(validate_identifier("public; drop table sales").is_err());
        assert!(validate_identifier("1retail").is_err());
        assert!(validate_identifier("").is_err());
    }
}
