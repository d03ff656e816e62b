use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Transaction};

use retailscope_core::{Category, Product, Sale, Store};

use crate::errors::Result;

// Every column is cast so text ids, float prices and smallint quantities
// exported by other tools still decode into the catalog types.

#[derive(Debug, FromRow)]
pub struct StoreRow {
    pub store_id: String,
    pub store_name: String,
    pub city: String,
    pub country: String,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            store_id: row.store_id,
            store_name: row.store_name,
            city: row.city,
            country: row.country,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct CategoryRow {
    pub category_id: String,
    pub category_name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            category_id: row.category_id,
            category_name: row.category_name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub product_id: String,
    pub product_name: String,
    pub category_id: String,
    pub launch_date: NaiveDate,
    pub price: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            product_name: row.product_name,
            category_id: row.category_id,
            launch_date: row.launch_date,
            price: row.price,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SaleRow {
    pub sale_id: String,
    pub sale_date: NaiveDate,
    pub store_id: String,
    pub product_id: String,
    pub quantity: i64,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            sale_id: row.sale_id,
            sale_date: row.sale_date,
            store_id: row.store_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ClaimRow {
    pub claim_id: String,
    pub claim_date: NaiveDate,
    pub sale_id: Option<String>,
    pub repair_status: String,
}

pub async fn fetch_stores(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
) -> Result<Vec<StoreRow>> {
    let sql = format!(
        r#"
        select store_id::text as store_id, store_name::text as store_name,
               city::text as city, country::text as country
        from {schema}.stores
        order by store_id
        "#
    );
    Ok(sqlx::query_as::<_, StoreRow>(&sql)
        .fetch_all(&mut **tx)
        .await?)
}

pub async fn fetch_categories(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
) -> Result<Vec<CategoryRow>> {
    let sql = format!(
        r#"
        select category_id::text as category_id, category_name::text as category_name
        from {schema}.category
        order by category_id
        "#
    );
    Ok(sqlx::query_as::<_, CategoryRow>(&sql)
        .fetch_all(&mut **tx)
        .await?)
}

pub async fn fetch_products(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
) -> Result<Vec<ProductRow>> {
    let sql = format!(
        r#"
        select product_id::text as product_id, product_name::text as product_name,
               category_id::text as category_id, launch_date::date as launch_date,
               price::numeric as price
        from {schema}.products
        order by product_id
        "#
    );
    Ok(sqlx::query_as::<_, ProductRow>(&sql)
        .fetch_all(&mut **tx)
        .await?)
}

pub async fn fetch_sales(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
) -> Result<Vec<SaleRow>> {
    let sql = format!(
        r#"
        select sale_id::text as sale_id, sale_date::date as sale_date,
               store_id::text as store_id, product_id::text as product_id,
               quantity::bigint as quantity
        from {schema}.sales
        order by sale_id
        "#
    );
    Ok(sqlx::query_as::<_, SaleRow>(&sql)
        .fetch_all(&mut **tx)
        .await?)
}

pub async fn fetch_claims(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
) -> Result<Vec<ClaimRow>> {
    let sql = format!(
        r#"
        select claim_id::text as claim_id, claim_date::date as claim_date,
               sale_id::text as sale_id, repair_status::text as repair_status
        from {schema}.warranty
        order by claim_id
        "#
    );
    Ok(sqlx::query_as::<_, ClaimRow>(&sql)
        .fetch_all(&mut **tx)
        .await?)
}
