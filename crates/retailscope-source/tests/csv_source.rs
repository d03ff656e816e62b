use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use retailscope_core::{RepairStatus, validate_dataset};
use retailscope_source::{CsvSource, DatasetSource, LoadOptions, SourceError, dataset_fingerprint};
use rust_decimal_macros::dec;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/retail")
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "retailscope_source_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn copy_fixture(label: &str) -> PathBuf {
    let dir = temp_dir(label);
    for entry in fs::read_dir(fixture_dir()).expect("read fixture dir") {
        let entry = entry.expect("fixture entry");
        fs::copy(entry.path(), dir.join(entry.file_name())).expect("copy fixture");
    }
    dir
}

#[tokio::test]
async fn loads_fixture_directory() {
    let loaded = CsvSource::new(fixture_dir())
        .load()
        .await
        .expect("load fixture");
    let dataset = &loaded.dataset;

    assert_eq!(
        dataset.row_counts(),
        vec![
            ("stores", 3),
            ("category", 4),
            ("products", 3),
            ("sales", 9),
            ("warranty", 7)
        ]
    );
    assert!(loaded.warnings.is_empty());

    let product = dataset.product("P-1").expect("P-1 loaded");
    assert_eq!(product.product_name, "iPhone 15");
    assert_eq!(product.price, dec!(799.00));

    let sale = dataset.sale("S-1").expect("S-1 loaded");
    assert_eq!(sale.sale_date, NaiveDate::from_ymd_opt(2022, 3, 7).unwrap());

    let orphan = &dataset.claims()[0];
    assert!(orphan.sale_id.is_none());
    assert_eq!(orphan.repair_status, RepairStatus::Rejected);

    assert!(validate_dataset(dataset).is_ok());
}

#[test]
fn fingerprint_is_stable_across_loads() {
    let a = CsvSource::new(fixture_dir()).load_sync().expect("load a");
    let b = CsvSource::new(fixture_dir()).load_sync().expect("load b");

    let fp_a = dataset_fingerprint(&a.dataset).expect("fingerprint a");
    let fp_b = dataset_fingerprint(&b.dataset).expect("fingerprint b");
    assert_eq!(fp_a, fp_b);
    assert_eq!(fp_a.len(), 64);
}

#[test]
fn missing_file_is_reported() {
    let dir = copy_fixture("missing_file");
    fs::remove_file(dir.join("warranty.csv")).expect("remove warranty.csv");

    let err = CsvSource::new(&dir).load_sync().expect_err("load should fail");
    assert!(matches!(err, SourceError::MissingFile { ref table, .. } if table == "warranty"));
}

#[test]
fn missing_required_column_is_reported() {
    let dir = copy_fixture("missing_column");
    fs::write(
        dir.join("stores.csv"),
        "store_id,store_name,city\nST-1,Apple Fifth Avenue,New York\n",
    )
    .expect("rewrite stores.csv");

    let err = CsvSource::new(&dir).load_sync().expect_err("load should fail");
    match err {
        SourceError::MissingColumns { table, columns } => {
            assert_eq!(table, "stores");
            assert_eq!(columns, "country");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_value_names_row_and_column() {
    let dir = copy_fixture("invalid_value");
    fs::write(
        dir.join("sales.csv"),
        "sale_id,sale_date,store_id,product_id,quantity\nS-1,2023-01-01,ST-1,P-1,3\nS-2,2023-01-02,ST-1,P-1,many\n",
    )
    .expect("rewrite sales.csv");

    let err = CsvSource::new(&dir).load_sync().expect_err("load should fail");
    match err {
        SourceError::InvalidValue {
            table, column, row, ..
        } => {
            assert_eq!(table, "sales");
            assert_eq!(column, "quantity");
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn extra_columns_warn_or_fail() {
    let dir = copy_fixture("extra_columns");
    fs::write(
        dir.join("category.csv"),
        "category_id,category_name,notes\nCAT-1,Smartphone,flagship\n",
    )
    .expect("rewrite category.csv");

    let loaded = CsvSource::new(&dir).load_sync().expect("lenient load");
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].code, "extra_columns");
    assert_eq!(loaded.warnings[0].path, "category");

    let options = LoadOptions {
        reject_extra_columns: true,
        ..LoadOptions::default()
    };
    let err = CsvSource::with_options(&dir, options)
        .load_sync()
        .expect_err("strict load should fail");
    assert!(matches!(err, SourceError::InvalidOption(_)));
}
