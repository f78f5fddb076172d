//! Error types for analyses.

use film_model::ModelError;
use thiserror::Error;

/// Errors raised by an analysis. Degenerate data (empty datasets, no
/// groups) is never an error; only structural problems are.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The dataset schema lacks a column the analysis reads.
    #[error("analysis '{analysis}' requires column '{column}'")]
    MissingColumn { analysis: String, column: String },

    /// A catalog lookup named an analysis that is not registered.
    #[error("unknown analysis '{name}' (available: {})", .available.join(", "))]
    UnknownAnalysis {
        name: String,
        available: Vec<String>,
    },

    /// Building a derived dataset or output table failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
