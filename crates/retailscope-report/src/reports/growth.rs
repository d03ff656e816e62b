use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use retailscope_core::Dataset;

use crate::numeric::percentage;
use crate::params::ReportParams;
use crate::rows::StoreGrowthRow;

/// Year-over-year revenue growth per store.
///
/// Revenue is `quantity * price` summed per store and year. Each year is
/// compared with the store's previous year that has sales (a lag over the
/// ordered years, not necessarily the calendar year before). The first year
/// of every store and the current year of `params.as_of` are omitted; a
/// zero prior revenue yields a growth ratio of zero.
///
/// Revenue that exceeds the `Decimal` range saturates at `Decimal::MAX`
/// (or `MIN`) and logs a `revenue_overflow` warning.
pub fn store_growth(dataset: &Dataset, params: &ReportParams) -> Vec<StoreGrowthRow> {
    let mut revenue: BTreeMap<&str, BTreeMap<i32, Decimal>> = BTreeMap::new();

    for sale in dataset.sales() {
        let (Some(store), Some(product)) = (
            dataset.store(&sale.store_id),
            dataset.product(&sale.product_id),
        ) else {
            continue;
        };
        let quantity = Decimal::from(sale.quantity);
        let line = quantity.checked_mul(product.price).unwrap_or_else(|| {
            warn_overflow(&store.store_id, &sale.sale_id);
            quantity.saturating_mul(product.price)
        });
        let total = revenue
            .entry(store.store_id.as_str())
            .or_default()
            .entry(sale.sale_date.year())
            .or_insert(Decimal::ZERO);
        let running = *total;
        *total = running.checked_add(line).unwrap_or_else(|| {
            warn_overflow(&store.store_id, &sale.sale_id);
            running.saturating_add(line)
        });
    }

    let current_year = params.current_year();
    let mut rows = Vec::new();

    for (store_id, years) in revenue {
        let store_name = dataset
            .store(store_id)
            .map(|store| store.store_name.clone())
            .unwrap_or_default();

        let mut prior: Option<Decimal> = None;
        for (year, current) in years {
            if let Some(prior_revenue) = prior {
                if year != current_year {
                    rows.push(StoreGrowthRow {
                        store_id: store_id.to_string(),
                        store_name: store_name.clone(),
                        year,
                        prior_revenue,
                        current_revenue: current,
                        growth_ratio: percentage(
                            current.saturating_sub(prior_revenue),
                            prior_revenue,
                            3,
                        ),
                    });
                }
            }
            prior = Some(current);
        }
    }

    rows
}

fn warn_overflow(store_id: &str, sale_id: &str) {
    tracing::warn!(
        event = "revenue_overflow",
        store_id = %store_id,
        sale_id = %sale_id
    );
}
