use sha2::{Digest, Sha256};

use retailscope_core::Dataset;

use crate::errors::Result;

/// SHA-256 (hex) over the canonical JSON form of the dataset.
///
/// Two snapshots with the same rows in the same order share a fingerprint,
/// regardless of which source produced them.
pub fn dataset_fingerprint(dataset: &Dataset) -> Result<String> {
    let bytes = serde_json::to_vec(dataset)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
