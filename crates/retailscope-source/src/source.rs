use async_trait::async_trait;
use serde::Serialize;

use retailscope_core::Dataset;

use crate::errors::Result;

/// Non-fatal finding raised while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    pub code: String,
    pub path: String,
    pub message: String,
}

/// A populated dataset plus the warnings collected on the way.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub warnings: Vec<LoadWarning>,
}

/// Trait implemented by everything that can produce a dataset snapshot.
#[async_trait]
pub trait DatasetSource {
    /// Returns the source identifier (e.g. `csv`, `postgres`).
    fn kind(&self) -> &'static str;

    /// Load all five relations into an immutable snapshot.
    async fn load(&self) -> Result<Loaded>;
}
