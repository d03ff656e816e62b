//! Run every report against the bundled CSV fixture and print the markdown
//! summary.
//!
//! `cargo run -p retailscope-report --example run_fixture -- [DATA_DIR] [AS_OF]`

use std::path::PathBuf;

use chrono::NaiveDate;
use retailscope_report::{ReportParams, ReportSet, render_markdown};
use retailscope_source::{CsvSource, dataset_fingerprint};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let data_dir = args.next().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../retailscope-source/tests/fixtures/retail")
    });
    let as_of = match args.next() {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")?,
        None => NaiveDate::from_ymd_opt(2024, 6, 15).ok_or("invalid default date")?,
    };

    let loaded = CsvSource::new(&data_dir).load_sync()?;
    for warning in &loaded.warnings {
        eprintln!("warning: {} {}", warning.path, warning.message);
    }

    let fingerprint = dataset_fingerprint(&loaded.dataset)?;
    let set = ReportSet::run_all(&loaded.dataset, &ReportParams::new(as_of));
    println!(
        "{}",
        render_markdown(&set, &loaded.dataset.row_counts(), Some(&fingerprint))
    );
    Ok(())
}
