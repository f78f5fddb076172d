//! Batch pipeline: load once, run the catalog, write each artifact.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use film_analytics::{AnalysisOutcome, CatalogConfig, QueryCatalog};
use film_ingest::{IngestOptions, read_dataset, read_input};
use film_output::{Manifest, ensure_output_dir, sha256_hex, write_artifact, write_manifest};
use rayon::ThreadPoolBuilder;
use tracing::{info, info_span, warn};

use crate::types::{AnalysisStatus, AnalysisSummary, BatchResult};

/// Everything a batch run needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub config: CatalogConfig,
    /// Analyses to run; empty means all.
    pub only: Vec<String>,
    /// Worker threads; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
    pub delimiter: u8,
    pub require_movie_columns: bool,
    pub dry_run: bool,
    pub fail_fast: bool,
}

impl BatchOptions {
    /// Defaults for `input`: output next to it in `output/`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output_dir = default_output_dir(&input);
        Self {
            input,
            output_dir,
            config: CatalogConfig::default(),
            only: Vec::new(),
            jobs: None,
            delimiter: b',',
            require_movie_columns: true,
            dry_run: false,
            fail_fast: false,
        }
    }
}

/// `<input dir>/output`.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("output")
}

/// Convert a delimiter flag into the single byte the reader needs.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{delimiter}'");
    }
    Ok(delimiter as u8)
}

/// Run one batch. Load errors abort before any analysis runs; analysis
/// failures are recorded and the remaining artifacts are still written
/// unless `fail_fast` is set.
pub fn run_batch(options: &BatchOptions) -> Result<BatchResult> {
    let batch_span = info_span!("batch", input = %options.input.display());
    let _batch_guard = batch_span.enter();

    let catalog = QueryCatalog::standard(options.config.clone());
    let catalog = if options.only.is_empty() {
        catalog
    } else {
        catalog.select(&options.only)?
    };

    let ingest_options = if options.require_movie_columns {
        IngestOptions::movies()
    } else {
        IngestOptions::default()
    }
    .with_delimiter(options.delimiter);
    let load_start = Instant::now();
    // One read serves both the parse and the manifest checksum.
    let input_bytes = read_input(&options.input)
        .with_context(|| format!("load dataset: {}", options.input.display()))?;
    let input_sha256 = sha256_hex(&input_bytes);
    let dataset = read_dataset(input_bytes.as_slice(), &options.input, &ingest_options)
        .with_context(|| format!("load dataset: {}", options.input.display()))?;
    drop(input_bytes);
    info!(
        rows = dataset.len(),
        columns = dataset.schema().len(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    let outcomes = match options.jobs {
        Some(threads) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("build worker pool")?;
            pool.install(|| catalog.run_all(&dataset))
        }
        None => catalog.run_all(&dataset),
    };

    let mut manifest = None;
    if !options.dry_run {
        ensure_output_dir(&options.output_dir)?;
        manifest = Some(Manifest::new(Some(input_sha256)));
    }

    let mut analyses = Vec::with_capacity(outcomes.len());
    let mut stop = false;
    for outcome in outcomes {
        let description = catalog
            .get(outcome.name)
            .map(|spec| spec.description)
            .unwrap_or_default();
        let summary = if stop {
            skipped(outcome, description)
        } else {
            let summary = settle(outcome, description, options, manifest.as_mut())?;
            if summary.status.is_failure() && options.fail_fast {
                warn!(analysis = summary.name, "stopping after first failure");
                stop = true;
            }
            summary
        };
        analyses.push(summary);
    }

    let manifest_path = match &manifest {
        Some(manifest) => Some(write_manifest(&options.output_dir, manifest)?),
        None => None,
    };
    let has_errors = analyses.iter().any(|a| a.status.is_failure());
    info!(
        analyses = analyses.len(),
        failed = analyses.iter().filter(|a| a.status.is_failure()).count(),
        "batch complete"
    );

    Ok(BatchResult {
        input: options.input.clone(),
        output_dir: options.output_dir.clone(),
        rows_loaded: dataset.len(),
        analyses,
        manifest: manifest_path,
        has_errors,
    })
}

/// Write a successful outcome (unless dry-running) and summarize it.
fn settle(
    outcome: AnalysisOutcome,
    description: &'static str,
    options: &BatchOptions,
    manifest: Option<&mut Manifest>,
) -> Result<AnalysisSummary> {
    let AnalysisOutcome {
        name,
        result,
        elapsed,
    } = outcome;
    let table = match result {
        Ok(table) => table,
        Err(error) => {
            if let Some(manifest) = manifest {
                manifest.record_failure(name, &error);
            }
            return Ok(AnalysisSummary {
                name,
                description,
                rows: None,
                file: None,
                status: AnalysisStatus::Failed(error.to_string()),
                elapsed,
            });
        }
    };

    let (file, status) = match manifest {
        Some(manifest) => {
            let entry = write_artifact(&options.output_dir, name, &table)
                .with_context(|| format!("write artifact '{name}'"))?;
            let path = options.output_dir.join(&entry.file);
            manifest.record_artifact(entry);
            (Some(path), AnalysisStatus::Written)
        }
        None => (None, AnalysisStatus::Computed),
    };
    Ok(AnalysisSummary {
        name,
        description,
        rows: Some(table.height()),
        file,
        status,
        elapsed,
    })
}

fn skipped(outcome: AnalysisOutcome, description: &'static str) -> AnalysisSummary {
    AnalysisSummary {
        name: outcome.name,
        description,
        rows: outcome.result.as_ref().ok().map(film_model::Table::height),
        file: None,
        status: AnalysisStatus::Skipped,
        elapsed: outcome.elapsed,
    }
}
