use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::Result;
use crate::kind::ReportKind;
use crate::set::{ReportResult, ReportSet};

/// A report file written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEntry {
    pub report: ReportKind,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Write one report as CSV and return the bytes written. Headers come from
/// the row fields, so an empty row report produces an empty file.
pub fn write_report_csv(
    path: &Path,
    result: &ReportResult,
) -> std::result::Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(counting);

    match result {
        ReportResult::ClaimsInYear(count) | ReportResult::ClaimsWithinWindow(count) => {
            writer.write_record(["report", "count"])?;
            writer.write_record([result.kind().slug().to_string(), count.to_string()])?;
        }
        ReportResult::BestSellingDay(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::LeastSellingProduct(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::RecentLaunchClaims(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::HighVolumeMonths(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::CategoryClaims(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::CountryClaimRisk(rows) => serialize_rows(&mut writer, rows)?,
        ReportResult::StoreGrowth(rows) => serialize_rows(&mut writer, rows)?,
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// Write `reports/<slug>.csv` for every result plus `reports.json` for the
/// whole set under `dir`.
///
/// Each file is written to a hidden temp sibling and renamed into place, so
/// a reader never sees a partial artifact.
pub fn write_report_set(dir: &Path, set: &ReportSet) -> Result<Vec<ArtifactEntry>> {
    let reports_dir = dir.join("reports");
    fs::create_dir_all(&reports_dir)?;

    let mut entries = Vec::with_capacity(set.reports.len());
    for result in &set.reports {
        let path = reports_dir.join(format!("{}.csv", result.kind().slug()));
        let tmp_path = temp_sibling(&path);
        let bytes = write_report_csv(&tmp_path, result)?;
        fs::rename(&tmp_path, &path)?;
        entries.push(ArtifactEntry {
            report: result.kind(),
            path,
            rows: result.row_count(),
            bytes,
        });
    }

    let json_path = dir.join("reports.json");
    let tmp_path = temp_sibling(&json_path);
    let mut file = File::create(&tmp_path)?;
    file.write_all(&serde_json::to_vec_pretty(set)?)?;
    file.sync_all()?;
    fs::rename(&tmp_path, &json_path)?;

    Ok(entries)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn serialize_rows<W: Write, T: Serialize>(
    writer: &mut csv::Writer<W>,
    rows: &[T],
) -> std::result::Result<(), csv::Error> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
