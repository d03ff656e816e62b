use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weekday with the highest unit volume for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSellingDayRow {
    pub store_id: String,
    /// Absent when the sale points at an unknown store.
    pub store_name: Option<String>,
    pub weekday: String,
    pub total_quantity: i64,
}

/// Product with the lowest all-time unit volume in a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeastSellingProductRow {
    pub country: String,
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
}

/// Claim and sale counts for a recently launched product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLaunchClaimsRow {
    pub product_id: String,
    pub product_name: String,
    pub claim_count: u64,
    pub sale_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighVolumeMonthRow {
    /// `MM-YYYY`.
    pub month: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryClaimsRow {
    pub category_id: String,
    pub category_name: String,
    pub claim_count: u64,
}

/// Warranty risk for a country: claims per hundred units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRiskRow {
    pub country: String,
    pub total_units: i64,
    pub total_claims: u64,
    pub risk: Decimal,
}

/// Revenue of a store in one year next to its previous recorded year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreGrowthRow {
    pub store_id: String,
    pub store_name: String,
    pub year: i32,
    pub prior_revenue: Decimal,
    pub current_revenue: Decimal,
    pub growth_ratio: Decimal,
}
