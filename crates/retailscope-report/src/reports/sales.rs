use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::Datelike;

use retailscope_core::Dataset;

use crate::params::ReportParams;
use crate::rank::top_ranked;
use crate::rows::{BestSellingDayRow, HighVolumeMonthRow, LeastSellingProductRow};

/// Weekday(s) with the highest summed quantity for every store with sales.
/// Quantity sums saturate at the `i64` bounds.
///
/// Ranking uses competition semantics, so tied weekdays are all returned,
/// Monday first.
pub fn best_selling_day(dataset: &Dataset, _params: &ReportParams) -> Vec<BestSellingDayRow> {
    let mut totals: BTreeMap<(&str, u32), i64> = BTreeMap::new();
    for sale in dataset.sales() {
        let weekday = sale.sale_date.weekday().num_days_from_monday();
        let total = totals.entry((sale.store_id.as_str(), weekday)).or_insert(0);
        *total = total.saturating_add(sale.quantity);
    }

    let grouped: Vec<((&str, u32), i64)> = totals.into_iter().collect();
    top_ranked(grouped, |((store, _), _)| *store, |(_, total)| Reverse(*total))
        .into_iter()
        .map(|((store_id, weekday), total_quantity)| BestSellingDayRow {
            store_id: store_id.to_string(),
            store_name: dataset
                .store(store_id)
                .map(|store| store.store_name.clone()),
            weekday: weekday_name(weekday).to_string(),
            total_quantity,
        })
        .collect()
}

/// Product(s) with the lowest all-time quantity in each country.
pub fn least_selling_product(
    dataset: &Dataset,
    _params: &ReportParams,
) -> Vec<LeastSellingProductRow> {
    let mut totals: BTreeMap<(&str, &str), i64> = BTreeMap::new();
    for sale in dataset.sales() {
        let (Some(store), Some(product)) = (
            dataset.store(&sale.store_id),
            dataset.product(&sale.product_id),
        ) else {
            continue;
        };
        let total = totals
            .entry((store.country.as_str(), product.product_id.as_str()))
            .or_insert(0);
        *total = total.saturating_add(sale.quantity);
    }

    let grouped: Vec<((&str, &str), i64)> = totals.into_iter().collect();
    top_ranked(grouped, |((country, _), _)| *country, |(_, total)| *total)
        .into_iter()
        .filter_map(|((country, product_id), total_quantity)| {
            dataset.product(product_id).map(|product| LeastSellingProductRow {
                country: country.to_string(),
                product_id: product_id.to_string(),
                product_name: product.product_name.clone(),
                total_quantity,
            })
        })
        .collect()
}

/// Months in the lookback window where `params.high_volume_country` sold
/// more than `params.high_volume_threshold` units, oldest first.
pub fn high_volume_months(dataset: &Dataset, params: &ReportParams) -> Vec<HighVolumeMonthRow> {
    let window = params.lookback(params.high_volume_lookback_years);
    let mut totals: BTreeMap<(i32, u32), i64> = BTreeMap::new();

    for sale in dataset.sales() {
        if !window.contains(sale.sale_date) {
            continue;
        }
        let Some(store) = dataset.store(&sale.store_id) else {
            continue;
        };
        if store.country != params.high_volume_country {
            continue;
        }
        let total = totals
            .entry((sale.sale_date.year(), sale.sale_date.month()))
            .or_insert(0);
        *total = total.saturating_add(sale.quantity);
    }

    totals
        .into_iter()
        .filter(|(_, total)| *total > params.high_volume_threshold)
        .map(|((year, month), total_quantity)| HighVolumeMonthRow {
            month: format!("{month:02}-{year:04}"),
            total_quantity,
        })
        .collect()
}

fn weekday_name(days_from_monday: u32) -> &'static str {
    match days_from_monday {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        6 => "Sunday",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_start_monday() {
        assert_eq!(weekday_name(0), "Monday");
        assert_eq!(weekday_name(6), "Sunday");
        assert_eq!(weekday_name(7), "Unknown");
    }
}
