use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub rows_loaded: usize,
    pub analyses: Vec<AnalysisSummary>,
    pub manifest: Option<PathBuf>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct AnalysisSummary {
    pub name: &'static str,
    pub description: &'static str,
    pub rows: Option<usize>,
    pub file: Option<PathBuf>,
    pub status: AnalysisStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Artifact written to disk.
    Written,
    /// Computed but not written (dry run).
    Computed,
    Failed(String),
    /// Not written because an earlier analysis failed under `--fail-fast`.
    Skipped,
}

impl AnalysisStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
