use std::collections::BTreeMap;

use rust_decimal::Decimal;

use retailscope_core::Dataset;

use super::{claims_per_sale, joined_rows};
use crate::numeric::percentage;
use crate::params::ReportParams;
use crate::rows::CountryRiskRow;

/// Units sold, claims filed and claim risk (claims per 100 units, 2 dp) per
/// country, riskiest first.
///
/// Built on `sales JOIN stores LEFT JOIN warranty`: a sale with several
/// claims repeats its quantity once per claim, and countries without claims
/// still appear with a risk of zero.
pub fn country_claim_risk(dataset: &Dataset, _params: &ReportParams) -> Vec<CountryRiskRow> {
    let claims = claims_per_sale(dataset);
    let mut per_country: BTreeMap<&str, (i64, u64)> = BTreeMap::new();

    for sale in dataset.sales() {
        let Some(store) = dataset.store(&sale.store_id) else {
            continue;
        };
        let claim_count = claims.get(sale.sale_id.as_str()).copied().unwrap_or(0);
        let rows = i64::try_from(joined_rows(claim_count)).unwrap_or(i64::MAX);

        let entry = per_country.entry(store.country.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(sale.quantity.saturating_mul(rows));
        entry.1 += claim_count;
    }

    let mut rows: Vec<CountryRiskRow> = per_country
        .into_iter()
        .map(|(country, (total_units, total_claims))| CountryRiskRow {
            country: country.to_string(),
            total_units,
            total_claims,
            risk: if total_units > 0 {
                percentage(Decimal::from(total_claims), Decimal::from(total_units), 2)
            } else {
                Decimal::ZERO
            },
        })
        .collect();
    rows.sort_by(|a, b| b.risk.cmp(&a.risk).then_with(|| a.country.cmp(&b.country)));
    rows
}
