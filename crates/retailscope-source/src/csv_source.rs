use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;

use retailscope_core::{
    CATALOG, Category, Dataset, Product, RepairStatus, Sale, Store, TableDef, WarrantyClaim,
    load_order, table_def,
};

use crate::errors::{Result, SourceError};
use crate::options::LoadOptions;
use crate::parse::{is_null, parse_date, parse_decimal, parse_int};
use crate::source::{DatasetSource, LoadWarning, Loaded};

/// Loads `<table>.csv` files (`stores.csv`, `category.csv`, ...) from a directory.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
    options: LoadOptions,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_options(dir, LoadOptions::default())
    }

    pub fn with_options(dir: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the CSV file backing a catalog table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    /// Synchronous load; the async trait method delegates here.
    pub fn load_sync(&self) -> Result<Loaded> {
        let mut warnings = Vec::new();
        let mut raw: HashMap<&'static str, RawTable> = HashMap::new();

        for name in load_order(CATALOG)? {
            let table = table_def(name)?;
            let data = self.read_table(table, &mut warnings)?;
            tracing::debug!(
                event = "table_loaded",
                table = table.name,
                rows = data.records.len()
            );
            raw.insert(table.name, data);
        }

        let stores = map_rows(&raw, "stores", &self.options, |row| {
            Ok(Store {
                store_id: row.text("store_id")?,
                store_name: row.text("store_name")?,
                city: row.text("city")?,
                country: row.text("country")?,
            })
        })?;
        let categories = map_rows(&raw, "category", &self.options, |row| {
            Ok(Category {
                category_id: row.text("category_id")?,
                category_name: row.text("category_name")?,
            })
        })?;
        let products = map_rows(&raw, "products", &self.options, |row| {
            Ok(Product {
                product_id: row.text("product_id")?,
                product_name: row.text("product_name")?,
                category_id: row.text("category_id")?,
                launch_date: row.date("launch_date")?,
                price: row.decimal("price")?,
            })
        })?;
        let sales = map_rows(&raw, "sales", &self.options, |row| {
            Ok(Sale {
                sale_id: row.text("sale_id")?,
                sale_date: row.date("sale_date")?,
                store_id: row.text("store_id")?,
                product_id: row.text("product_id")?,
                quantity: row.int("quantity")?,
            })
        })?;
        let claims = map_rows(&raw, "warranty", &self.options, |row| {
            Ok(WarrantyClaim {
                claim_id: row.text("claim_id")?,
                claim_date: row.date("claim_date")?,
                sale_id: row.opt_text("sale_id"),
                repair_status: RepairStatus::from(row.text("repair_status")?),
            })
        })?;

        Ok(Loaded {
            dataset: Dataset::new(stores, categories, products, sales, claims),
            warnings,
        })
    }

    fn read_table(
        &self,
        table: &'static TableDef,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<RawTable> {
        let path = self.table_path(table.name);
        if !path.exists() {
            return Err(SourceError::MissingFile {
                table: table.name.to_string(),
                path: path.display().to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let headers = reader
            .headers()?
            .iter()
            .map(|header| header.to_lowercase())
            .collect::<Vec<_>>();

        let mut positions = HashMap::new();
        let mut missing = Vec::new();
        for column in table.columns {
            match headers.iter().position(|header| header == column.name) {
                Some(position) => {
                    positions.insert(column.name, position);
                }
                None if column.is_nullable => {}
                None => missing.push(column.name),
            }
        }

        if !missing.is_empty() {
            return Err(SourceError::MissingColumns {
                table: table.name.to_string(),
                columns: missing.join(", "),
            });
        }

        let extra = headers
            .iter()
            .filter(|header| table.column(header).is_none())
            .cloned()
            .collect::<Vec<_>>();
        if !extra.is_empty() {
            if self.options.reject_extra_columns {
                return Err(SourceError::InvalidOption(format!(
                    "unexpected columns in {}: {}",
                    table.name,
                    extra.join(", ")
                )));
            }
            tracing::warn!(event = "extra_columns", table = table.name, columns = %extra.join(", "));
            warnings.push(LoadWarning {
                code: "extra_columns".to_string(),
                path: table.name.to_string(),
                message: format!("unexpected columns: {}", extra.join(", ")),
            });
        }

        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(RawTable {
            table,
            positions,
            records,
        })
    }
}

#[async_trait]
impl DatasetSource for CsvSource {
    fn kind(&self) -> &'static str {
        "csv"
    }

    async fn load(&self) -> Result<Loaded> {
        self.load_sync()
    }
}

struct RawTable {
    table: &'static TableDef,
    positions: HashMap<&'static str, usize>,
    records: Vec<StringRecord>,
}

/// Typed accessor over one CSV record.
struct RecordView<'a> {
    table: &'static TableDef,
    positions: &'a HashMap<&'static str, usize>,
    record: &'a StringRecord,
    row: u64,
    options: &'a LoadOptions,
}

impl RecordView<'_> {
    fn raw(&self, column: &str) -> Option<&str> {
        self.positions
            .get(column)
            .and_then(|position| self.record.get(*position))
            .filter(|value| !is_null(value))
    }

    fn required(&self, column: &str) -> Result<&str> {
        self.raw(column)
            .ok_or_else(|| self.invalid(column, "missing value".to_string()))
    }

    fn invalid(&self, column: &str, message: String) -> SourceError {
        SourceError::InvalidValue {
            table: self.table.name.to_string(),
            column: column.to_string(),
            row: self.row,
            message,
        }
    }

    fn text(&self, column: &str) -> Result<String> {
        self.required(column).map(str::to_string)
    }

    fn opt_text(&self, column: &str) -> Option<String> {
        self.raw(column).map(str::to_string)
    }

    fn date(&self, column: &str) -> Result<NaiveDate> {
        parse_date(self.required(column)?, &self.options.date_formats)
            .map_err(|message| self.invalid(column, message))
    }

    fn decimal(&self, column: &str) -> Result<Decimal> {
        parse_decimal(self.required(column)?).map_err(|message| self.invalid(column, message))
    }

    fn int(&self, column: &str) -> Result<i64> {
        parse_int(self.required(column)?).map_err(|message| self.invalid(column, message))
    }
}

fn map_rows<T>(
    raw: &HashMap<&'static str, RawTable>,
    table: &str,
    options: &LoadOptions,
    map: impl Fn(&RecordView<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let Some(data) = raw.get(table) else {
        return Ok(Vec::new());
    };

    data.records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            map(&RecordView {
                table: data.table,
                positions: &data.positions,
                record,
                row: idx as u64 + 1,
                options,
            })
        })
        .collect()
}
