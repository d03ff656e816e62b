use std::collections::BTreeMap;
use std::fs::{OpenOptions, create_dir_all};
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use retailscope_core::DATASET_VERSION;
use retailscope_report::{ReportKind, ReportParams};
use retailscope_source::RedactedUrl;

use super::atomic::write_json_atomic;
use super::RegistryResult;

/// Where the dataset of a run came from. Never holds a raw credential.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunSource {
    Csv { data_dir: PathBuf },
    Postgres { connection: RedactedUrl, schema: String },
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub source: RunSource,
    pub params: ReportParams,
    pub reports: Vec<ReportKind>,
    pub parallel: bool,
    pub allow_invalid: bool,
}

/// Facts about the loaded snapshot, recorded once loading succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub fingerprint: String,
    pub rows: BTreeMap<String, usize>,
    pub load_warnings: usize,
    pub validation_errors: usize,
    pub validation_warnings: usize,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    run_id: &'a str,
    started_at: String,
    cli_version: &'static str,
    dataset_version: &'static str,
    source: &'a RunSource,
    params: &'a ReportParams,
    reports: Vec<&'static str>,
    parallel: bool,
    allow_invalid: bool,
    dataset: Option<&'a DatasetSummary>,
    git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
struct GitInfo {
    commit: Option<String>,
    dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
    pub markdown_path: PathBuf,
}

/// Create `<run_dir>/<timestamp>__run_<id>/` with an initial `config.json`
/// and an empty `logs.ndjson`.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));
    create_dir_all(&root)?;

    let paths = RunPaths {
        config_path: root.join("config.json"),
        logs_path: root.join("logs.ndjson"),
        markdown_path: root.join("report.md"),
        root,
    };

    write_run_config(&paths, ctx, None)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

/// Rewrite `config.json`, adding the dataset summary when known.
pub fn write_run_config(
    paths: &RunPaths,
    ctx: &RunContext,
    dataset: Option<&DatasetSummary>,
) -> RegistryResult<()> {
    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        cli_version: env!("CARGO_PKG_VERSION"),
        dataset_version: DATASET_VERSION,
        source: &ctx.source,
        params: &ctx.params,
        reports: ctx.reports.iter().map(|kind| kind.slug()).collect(),
        parallel: ctx.parallel,
        allow_invalid: ctx.allow_invalid,
        dataset,
        git: collect_git_info(),
    };
    write_json_atomic(&paths.config_path, &config)
}

fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use retailscope_source::redact_database_url;

    use super::*;

    fn context(run_dir: PathBuf, source: RunSource) -> RunContext {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date");
        RunContext {
            run_id: "0000-test".to_string(),
            started_at: Utc
                .with_ymd_and_hms(2024, 6, 15, 8, 30, 0)
                .single()
                .expect("valid timestamp"),
            run_dir,
            source,
            params: ReportParams::new(as_of),
            reports: ReportKind::ALL.to_vec(),
            parallel: false,
            allow_invalid: false,
        }
    }

    fn read_config(paths: &RunPaths) -> serde_json::Value {
        let raw = std::fs::read(&paths.config_path).expect("read config");
        serde_json::from_slice(&raw).expect("parse config")
    }

    #[test]
    fn start_run_lays_out_directory() {
        let run_dir = std::env::temp_dir().join(format!("retailscope_runs_{}", uuid::Uuid::new_v4()));
        let ctx = context(
            run_dir.clone(),
            RunSource::Csv {
                data_dir: PathBuf::from("data"),
            },
        );

        let paths = start_run(&ctx).expect("start run");
        assert_eq!(
            paths.root,
            run_dir.join("2024-06-15T08-30-00Z__run_0000-test")
        );
        assert!(paths.logs_path.exists());

        let config = read_config(&paths);
        assert_eq!(config["run_id"], "0000-test");
        assert_eq!(config["source"]["kind"], "csv");
        assert_eq!(config["params"]["as_of"], "2024-06-15");
        assert_eq!(config["reports"][8], "store-growth");
        assert!(config["dataset"].is_null());

        let summary = DatasetSummary {
            fingerprint: "abc".to_string(),
            rows: BTreeMap::from([("sales".to_string(), 9)]),
            load_warnings: 0,
            validation_errors: 0,
            validation_warnings: 1,
        };
        write_run_config(&paths, &ctx, Some(&summary)).expect("rewrite config");
        let config = read_config(&paths);
        assert_eq!(config["dataset"]["fingerprint"], "abc");
        assert_eq!(config["dataset"]["rows"]["sales"], 9);

        std::fs::remove_dir_all(run_dir).ok();
    }

    #[test]
    fn config_never_contains_password() {
        let run_dir = std::env::temp_dir().join(format!("retailscope_runs_{}", uuid::Uuid::new_v4()));
        let ctx = context(
            run_dir.clone(),
            RunSource::Postgres {
                connection: redact_database_url("postgres://retail:hunter2@db:5432/shop"),
                schema: "public".to_string(),
            },
        );

        let paths = start_run(&ctx).expect("start run");
        let raw = std::fs::read_to_string(&paths.config_path).expect("read config");
        assert!(!raw.contains("hunter2"));
        assert!(raw.contains("\"postgres\""));

        std::fs::remove_dir_all(run_dir).ok();
    }
}
