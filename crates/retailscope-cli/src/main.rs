mod registry;
mod settings;
mod source;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use registry::{
    DatasetSummary, RunContext, RunPaths, init_run_logging, init_stderr_logging, start_run,
    write_bytes_atomic, write_json_atomic, write_run_config,
};
use retailscope_core::{
    CATALOG, Category, DATASET_VERSION, Product, Sale, Store, TableDef, ValidationReport,
    WarrantyClaim, load_order, validate_dataset,
};
use retailscope_report::{ReportError, ReportKind, ReportParams, ReportSet};
use retailscope_source::{Loaded, LoadWarning, SourceError, dataset_fingerprint};
use settings::{Settings, SettingsError, load_settings};
use source::SourceSpec;

const DEFAULT_RUN_DIR: &str = "runs";

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("core error: {0}")]
    Core(#[from] retailscope_core::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
    #[error("dataset has {errors} validation error(s); rerun with --allow-invalid to report anyway")]
    InvalidDataset { errors: usize },
}

#[derive(Parser, Debug)]
#[command(name = "retailscope", version, about = "Retail sales and warranty reports")]
struct Cli {
    /// Settings file (defaults to ./retailscope.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute reports and write a run directory.
    Report(ReportArgs),
    /// Load a dataset and check its integrity.
    Validate(ValidateArgs),
    /// Print the table catalog and row JSON schemas.
    Schema(SchemaArgs),
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Directory holding stores.csv, category.csv, products.csv, sales.csv, warranty.csv.
    #[arg(long, value_name = "DIR", conflicts_with = "database_url")]
    data_dir: Option<PathBuf>,
    /// PostgreSQL connection string.
    #[arg(long, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    /// Schema holding the five tables.
    #[arg(long, value_name = "SCHEMA")]
    pg_schema: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Reference date standing in for "today" (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,
    /// Only compute these reports (comma separated slugs).
    #[arg(long, value_name = "REPORT", value_delimiter = ',')]
    only: Vec<ReportKind>,
    /// Output directory for runs.
    #[arg(long, value_name = "DIR")]
    run_dir: Option<PathBuf>,
    /// Compute reports on worker threads.
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Report even when validation finds errors.
    #[arg(long, default_value_t = false)]
    allow_invalid: bool,
    /// Calendar year for the claims-in-year report.
    #[arg(long)]
    claims_year: Option<i32>,
    /// Country for the high-volume-months report.
    #[arg(long)]
    country: Option<String>,
    /// Monthly unit threshold for the high-volume-months report.
    #[arg(long)]
    threshold: Option<i64>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the document here instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Report(args) => run_report(args, &settings).await,
        Command::Validate(args) => run_validate(args, &settings).await,
        Command::Schema(args) => run_schema(args),
    }
}

async fn run_report(args: ReportArgs, settings: &Settings) -> Result<(), CliError> {
    let ReportArgs {
        source,
        as_of,
        only,
        run_dir,
        parallel,
        allow_invalid,
        claims_year,
        country,
        threshold,
    } = args;

    let spec = resolve_source(source, settings)?;
    let params = report_params(as_of, settings, claims_year, country, threshold);
    let reports = if only.is_empty() {
        ReportKind::ALL.to_vec()
    } else {
        only
    };

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: run_dir
            .or_else(|| settings.run_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUN_DIR)),
        source: spec.describe(),
        params,
        reports,
        parallel: parallel || settings.parallel.unwrap_or(false),
        allow_invalid,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        as_of = %run_ctx.params.as_of,
        run_root = %run_paths.root.display()
    );

    let timer = Instant::now();
    match execute_run(&run_ctx, &run_paths, &spec).await {
        Ok(()) => {
            let duration_ms = timer.elapsed().as_millis();
            tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
            println!("{}", run_paths.root.display());
            Ok(())
        }
        Err(err) => {
            let duration_ms = timer.elapsed().as_millis();
            tracing::error!(
                event = "run_finished",
                status = "failed",
                error = %err,
                duration_ms = duration_ms
            );
            Err(err)
        }
    }
}

/// Everything after the run directory exists; any error here still gets a
/// `run_finished` line from the caller.
async fn execute_run(
    run_ctx: &RunContext,
    run_paths: &RunPaths,
    spec: &SourceSpec,
) -> Result<(), CliError> {
    let (loaded, source_kind) = load_dataset(spec).await?;
    let dataset = &loaded.dataset;
    let fingerprint = dataset_fingerprint(dataset)?;
    let validation = validate_dataset(dataset);
    log_validation(&validation);

    let summary = DatasetSummary {
        fingerprint: fingerprint.clone(),
        rows: row_map(&loaded),
        load_warnings: loaded.warnings.len(),
        validation_errors: validation.errors.len(),
        validation_warnings: validation.warnings.len(),
    };
    write_run_config(run_paths, run_ctx, Some(&summary))?;

    tracing::info!(
        event = "dataset_loaded",
        source = source_kind,
        fingerprint = %fingerprint,
        sales = dataset.sales().len(),
        claims = dataset.claims().len()
    );

    if !validation.is_ok() && !run_ctx.allow_invalid {
        return Err(CliError::InvalidDataset {
            errors: validation.errors.len(),
        });
    }

    let set = if run_ctx.parallel {
        ReportSet::run_parallel(dataset, &run_ctx.params, &run_ctx.reports)
    } else {
        ReportSet::run(dataset, &run_ctx.params, &run_ctx.reports)
    };
    tracing::info!(event = "reports_computed", reports = set.reports.len());

    let artifacts = retailscope_report::write_report_set(&run_paths.root, &set)?;
    for artifact in &artifacts {
        tracing::debug!(
            event = "artifact_written",
            report = artifact.report.slug(),
            rows = artifact.rows,
            bytes = artifact.bytes
        );
    }

    let markdown =
        retailscope_report::render_markdown(&set, &dataset.row_counts(), Some(&fingerprint));
    write_bytes_atomic(&run_paths.markdown_path, markdown.as_bytes())?;
    tracing::info!(
        event = "reports_written",
        artifacts = artifacts.len(),
        path = %run_paths.markdown_path.display()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ValidateOutput<'a> {
    source: &'static str,
    fingerprint: String,
    rows: BTreeMap<String, usize>,
    load_warnings: &'a [LoadWarning],
    validation: &'a ValidationReport,
}

async fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<(), CliError> {
    init_stderr_logging()?;

    let spec = resolve_source(args.source, settings)?;
    let (loaded, source_kind) = load_dataset(&spec).await?;
    let validation = validate_dataset(&loaded.dataset);
    log_validation(&validation);

    let output = ValidateOutput {
        source: source_kind,
        fingerprint: dataset_fingerprint(&loaded.dataset)?,
        rows: row_map(&loaded),
        load_warnings: &loaded.warnings,
        validation: &validation,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if validation.is_ok() {
        Ok(())
    } else {
        Err(CliError::InvalidDataset {
            errors: validation.errors.len(),
        })
    }
}

#[derive(Debug, Serialize)]
struct SchemaDocument {
    dataset_version: &'static str,
    load_order: Vec<&'static str>,
    tables: &'static [TableDef],
    rows: BTreeMap<&'static str, schemars::schema::RootSchema>,
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let document = SchemaDocument {
        dataset_version: DATASET_VERSION,
        load_order: load_order(CATALOG)?,
        tables: CATALOG,
        rows: BTreeMap::from([
            ("stores", schemars::schema_for!(Store)),
            ("category", schemars::schema_for!(Category)),
            ("products", schemars::schema_for!(Product)),
            ("sales", schemars::schema_for!(Sale)),
            ("warranty", schemars::schema_for!(WarrantyClaim)),
        ]),
    };

    match args.out {
        Some(path) => write_json_atomic(&path, &document)?,
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

fn resolve_source(args: SourceArgs, settings: &Settings) -> Result<SourceSpec, CliError> {
    SourceSpec::resolve(args.data_dir, args.database_url, args.pg_schema, settings)
}

async fn load_dataset(spec: &SourceSpec) -> Result<(Loaded, &'static str), CliError> {
    let source = spec.open().await?;
    let loaded = source.load().await?;

    for warning in &loaded.warnings {
        tracing::warn!(
            event = "load_warning",
            code = %warning.code,
            path = %warning.path,
            message = %warning.message
        );
    }
    Ok((loaded, source.kind()))
}

fn report_params(
    as_of: Option<NaiveDate>,
    settings: &Settings,
    claims_year: Option<i32>,
    country: Option<String>,
    threshold: Option<i64>,
) -> ReportParams {
    let as_of = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let mut params = ReportParams::new(as_of);
    settings.params.apply(&mut params);

    if let Some(year) = claims_year {
        params.claims_year = year;
    }
    if let Some(country) = country {
        params.high_volume_country = country;
    }
    if let Some(threshold) = threshold {
        params.high_volume_threshold = threshold;
    }
    params
}

fn log_validation(report: &ValidationReport) {
    for issue in &report.errors {
        tracing::error!(
            event = "validation_error",
            code = %issue.code,
            path = %issue.path,
            message = %issue.message
        );
    }
    for issue in &report.warnings {
        tracing::warn!(
            event = "validation_warning",
            code = %issue.code,
            path = %issue.path,
            message = %issue.message
        );
    }
    tracing::info!(
        event = "validation_finished",
        errors = report.errors.len(),
        warnings = report.warnings.len()
    );
}

fn row_map(loaded: &Loaded) -> BTreeMap<String, usize> {
    loaded
        .dataset
        .row_counts()
        .into_iter()
        .map(|(table, rows)| (table.to_string(), rows))
        .collect()
}
