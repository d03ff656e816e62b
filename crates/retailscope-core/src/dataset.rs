use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Category, Product, Sale, Store, WarrantyClaim};

/// Immutable snapshot of the five retail relations.
///
/// Key lookups resolve to the first row carrying a key; duplicates are left
/// for [`crate::validate_dataset`] to report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    stores: Vec<Store>,
    categories: Vec<Category>,
    products: Vec<Product>,
    sales: Vec<Sale>,
    claims: Vec<WarrantyClaim>,
    #[serde(skip)]
    index: KeyIndex,
}

#[derive(Debug, Clone, Default)]
struct KeyIndex {
    stores: HashMap<String, usize>,
    categories: HashMap<String, usize>,
    products: HashMap<String, usize>,
    sales: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(
        stores: Vec<Store>,
        categories: Vec<Category>,
        products: Vec<Product>,
        sales: Vec<Sale>,
        claims: Vec<WarrantyClaim>,
    ) -> Self {
        let index = KeyIndex {
            stores: index_by(&stores, |row| &row.store_id),
            categories: index_by(&categories, |row| &row.category_id),
            products: index_by(&products, |row| &row.product_id),
            sales: index_by(&sales, |row| &row.sale_id),
        };

        Self {
            stores,
            categories,
            products,
            sales,
            claims,
            index,
        }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn claims(&self) -> &[WarrantyClaim] {
        &self.claims
    }

    pub fn store(&self, store_id: &str) -> Option<&Store> {
        self.index.stores.get(store_id).map(|idx| &self.stores[*idx])
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.index
            .categories
            .get(category_id)
            .map(|idx| &self.categories[*idx])
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.index
            .products
            .get(product_id)
            .map(|idx| &self.products[*idx])
    }

    pub fn sale(&self, sale_id: &str) -> Option<&Sale> {
        self.index.sales.get(sale_id).map(|idx| &self.sales[*idx])
    }

    /// Sale referenced by a claim, `None` for orphans and dangling ids.
    pub fn claim_sale(&self, claim: &WarrantyClaim) -> Option<&Sale> {
        claim.sale_id.as_deref().and_then(|sale_id| self.sale(sale_id))
    }

    /// Row counts per catalog table, in catalog order.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("stores", self.stores.len()),
            ("category", self.categories.len()),
            ("products", self.products.len()),
            ("sales", self.sales.len()),
            ("warranty", self.claims.len()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.row_counts().iter().all(|(_, count)| *count == 0)
    }
}

fn index_by<T>(rows: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        index.entry(key(row).clone()).or_insert(idx);
    }
    index
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::RepairStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![Store {
                store_id: "ST-1".to_string(),
                store_name: "Fifth Avenue".to_string(),
                city: "New York".to_string(),
                country: "USA".to_string(),
            }],
            vec![Category {
                category_id: "CAT-1".to_string(),
                category_name: "Laptop".to_string(),
            }],
            vec![
                Product {
                    product_id: "P-1".to_string(),
                    product_name: "Book Pro".to_string(),
                    category_id: "CAT-1".to_string(),
                    launch_date: date(2020, 1, 1),
                    price: dec!(1299.00),
                },
                Product {
                    product_id: "P-1".to_string(),
                    product_name: "Shadowed".to_string(),
                    category_id: "CAT-1".to_string(),
                    launch_date: date(2020, 1, 1),
                    price: dec!(1.00),
                },
            ],
            vec![Sale {
                sale_id: "S-1".to_string(),
                sale_date: date(2021, 5, 1),
                store_id: "ST-1".to_string(),
                product_id: "P-1".to_string(),
                quantity: 2,
            }],
            vec![
                WarrantyClaim {
                    claim_id: "CL-1".to_string(),
                    claim_date: date(2021, 6, 1),
                    sale_id: Some("S-1".to_string()),
                    repair_status: RepairStatus::Completed,
                },
                WarrantyClaim {
                    claim_id: "CL-2".to_string(),
                    claim_date: date(2021, 6, 1),
                    sale_id: None,
                    repair_status: RepairStatus::Pending,
                },
            ],
        )
    }

    #[test]
    fn lookups_resolve_first_row_for_key() {
        let dataset = sample();
        assert_eq!(dataset.product("P-1").unwrap().product_name, "Book Pro");
        assert_eq!(dataset.store("ST-1").unwrap().country, "USA");
        assert!(dataset.store("ST-9").is_none());
    }

    #[test]
    fn claim_sale_handles_orphans() {
        let dataset = sample();
        let claims = dataset.claims();
        assert_eq!(dataset.claim_sale(&claims[0]).unwrap().sale_id, "S-1");
        assert!(dataset.claim_sale(&claims[1]).is_none());
    }

    #[test]
    fn default_dataset_is_empty() {
        assert!(Dataset::default().is_empty());
        assert!(!sample().is_empty());
    }
}
