use std::collections::BTreeMap;

use chrono::Datelike;

use retailscope_core::Dataset;

use super::{claims_per_sale, joined_rows};
use crate::params::ReportParams;
use crate::rows::{CategoryClaimsRow, RecentLaunchClaimsRow};

/// Number of warranty claims filed during `params.claims_year`.
pub fn claims_in_year(dataset: &Dataset, params: &ReportParams) -> u64 {
    dataset
        .claims()
        .iter()
        .filter(|claim| claim.claim_date.year() == params.claims_year)
        .count() as u64
}

/// Claims filed at most `params.claim_window_days` days after their sale.
///
/// Claims without a resolvable sale compare against NULL and are not
/// counted.
pub fn claims_within_window(dataset: &Dataset, params: &ReportParams) -> u64 {
    dataset
        .claims()
        .iter()
        .filter_map(|claim| {
            dataset
                .claim_sale(claim)
                .map(|sale| (claim.claim_date - sale.sale_date).num_days())
        })
        .filter(|days| *days <= params.claim_window_days)
        .count() as u64
}

/// Claim and sale counts for products launched inside the lookback window.
///
/// Sales are the base relation; each contributes one joined row per claim
/// naming it (or one claimless row), so `sale_count` counts joined rows.
/// Only products with at least one claim are returned, ordered by id.
pub fn recent_launch_claims(
    dataset: &Dataset,
    params: &ReportParams,
) -> Vec<RecentLaunchClaimsRow> {
    let window = params.lookback(params.launch_lookback_years);
    let claims = claims_per_sale(dataset);
    let mut per_product: BTreeMap<&str, RecentLaunchClaimsRow> = BTreeMap::new();

    for sale in dataset.sales() {
        let Some(product) = dataset.product(&sale.product_id) else {
            continue;
        };
        if !window.contains(product.launch_date) {
            continue;
        }

        let claim_count = claims.get(sale.sale_id.as_str()).copied().unwrap_or(0);
        let entry = per_product
            .entry(product.product_id.as_str())
            .or_insert_with(|| RecentLaunchClaimsRow {
                product_id: product.product_id.clone(),
                product_name: product.product_name.clone(),
                claim_count: 0,
                sale_count: 0,
            });
        entry.claim_count += claim_count;
        entry.sale_count += joined_rows(claim_count);
    }

    per_product
        .into_values()
        .filter(|row| row.claim_count > 0)
        .collect()
}

/// Claims per product category over the lookback window.
///
/// Claims must resolve to a sale, a product and a category; anything else
/// drops out of the inner joins. Ordered by claim count, highest first.
pub fn category_claims(dataset: &Dataset, params: &ReportParams) -> Vec<CategoryClaimsRow> {
    let window = params.lookback(params.category_lookback_years);
    let mut per_category: BTreeMap<&str, (&str, u64)> = BTreeMap::new();

    for claim in dataset.claims() {
        if !window.contains(claim.claim_date) {
            continue;
        }
        let Some(category) = dataset
            .claim_sale(claim)
            .and_then(|sale| dataset.product(&sale.product_id))
            .and_then(|product| dataset.category(&product.category_id))
        else {
            continue;
        };
        per_category
            .entry(category.category_id.as_str())
            .or_insert((category.category_name.as_str(), 0))
            .1 += 1;
    }

    let mut rows: Vec<CategoryClaimsRow> = per_category
        .into_iter()
        .map(|(category_id, (category_name, claim_count))| CategoryClaimsRow {
            category_id: category_id.to_string(),
            category_name: category_name.to_string(),
            claim_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.claim_count
            .cmp(&a.claim_count)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    rows
}
