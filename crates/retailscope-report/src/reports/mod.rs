//! The nine reports. Join semantics follow the SQL they were defined with:
//! inner joins drop rows whose reference does not resolve, outer joins keep
//! them with the missing side treated as NULL.

mod claims;
mod growth;
mod risk;
mod sales;

use std::collections::HashMap;

use retailscope_core::Dataset;

pub use claims::{category_claims, claims_in_year, claims_within_window, recent_launch_claims};
pub use growth::store_growth;
pub use risk::country_claim_risk;
pub use sales::{best_selling_day, high_volume_months, least_selling_product};

/// Number of claims naming each sale id, orphans excluded.
fn claims_per_sale(dataset: &Dataset) -> HashMap<&str, u64> {
    let mut counts = HashMap::new();
    for claim in dataset.claims() {
        if let Some(sale_id) = claim.sale_id.as_deref() {
            *counts.entry(sale_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Rows a sale contributes to `sales LEFT JOIN warranty`: one per matching
/// claim, or a single claimless row.
fn joined_rows(claims: u64) -> u64 {
    claims.max(1)
}
