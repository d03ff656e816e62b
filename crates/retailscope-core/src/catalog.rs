use serde::Serialize;

use crate::error::{Error, Result};

/// Column storage type as declared in the source database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Text,
    Date,
    Numeric,
    Integer,
}

/// Column metadata for a catalog table.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub is_nullable: bool,
}

/// Single-column foreign key.
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub referenced_table: &'static str,
    pub referenced_column: &'static str,
}

/// A table of the retail dataset.
#[derive(Debug, Clone, Serialize)]
pub struct TableDef {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnDef],
    pub foreign_keys: &'static [ForeignKeyDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }
}

const fn col(name: &'static str, sql_type: SqlType, is_nullable: bool) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        is_nullable,
    }
}

const fn fk(
    column: &'static str,
    referenced_table: &'static str,
    referenced_column: &'static str,
) -> ForeignKeyDef {
    ForeignKeyDef {
        column,
        referenced_table,
        referenced_column,
    }
}

/// The five tables in the order their CSV exports are conventionally listed.
pub const CATALOG: &[TableDef] = &[
    TableDef {
        name: "stores",
        primary_key: "store_id",
        columns: &[
            col("store_id", SqlType::Text, false),
            col("store_name", SqlType::Text, false),
            col("city", SqlType::Text, false),
            col("country", SqlType::Text, false),
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "category",
        primary_key: "category_id",
        columns: &[
            col("category_id", SqlType::Text, false),
            col("category_name", SqlType::Text, false),
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "products",
        primary_key: "product_id",
        columns: &[
            col("product_id", SqlType::Text, false),
            col("product_name", SqlType::Text, false),
            col("category_id", SqlType::Text, false),
            col("launch_date", SqlType::Date, false),
            col("price", SqlType::Numeric, false),
        ],
        foreign_keys: &[fk("category_id", "category", "category_id")],
    },
    TableDef {
        name: "sales",
        primary_key: "sale_id",
        columns: &[
            col("sale_id", SqlType::Text, false),
            col("sale_date", SqlType::Date, false),
            col("store_id", SqlType::Text, false),
            col("product_id", SqlType::Text, false),
            col("quantity", SqlType::Integer, false),
        ],
        foreign_keys: &[
            fk("store_id", "stores", "store_id"),
            fk("product_id", "products", "product_id"),
        ],
    },
    TableDef {
        name: "warranty",
        primary_key: "claim_id",
        columns: &[
            col("claim_id", SqlType::Text, false),
            col("claim_date", SqlType::Date, false),
            col("sale_id", SqlType::Text, true),
            col("repair_status", SqlType::Text, false),
        ],
        foreign_keys: &[fk("sale_id", "sales", "sale_id")],
    },
];

/// Look up a catalog table by name (case-insensitive).
pub fn table_def(name: &str) -> Result<&'static TableDef> {
    CATALOG
        .iter()
        .find(|table| table.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownTable(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_point_at_primary_keys() {
        for table in CATALOG {
            for key in table.foreign_keys {
                let target = table_def(key.referenced_table).expect("referenced table");
                assert_eq!(target.primary_key, key.referenced_column);
                assert!(table.column(key.column).is_some());
            }
        }
    }

    #[test]
    fn only_claim_sale_is_nullable() {
        let nullable: Vec<String> = CATALOG
            .iter()
            .flat_map(|table| {
                table
                    .columns
                    .iter()
                    .filter(|column| column.is_nullable)
                    .map(move |column| format!("{}.{}", table.name, column.name))
            })
            .collect();
        assert_eq!(nullable, vec!["warranty.sale_id".to_string()]);
    }

    #[test]
    fn unknown_table_is_an_error() {
        assert!(matches!(table_def("returns"), Err(Error::UnknownTable(_))));
        assert_eq!(table_def("SALES").unwrap().name, "sales");
    }
}
