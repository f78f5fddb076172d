//! Analytics engine over a loaded film dataset.
//!
//! Components, leaf-first:
//!
//! - [`derive`]: numeric casts and release date decomposition
//! - [`sort`]: stable multi-key ordering and row filtering
//! - [`aggregate`]: sums, extremes, top-N rankings, group-by rollups
//! - [`explode`]: multi-value column explosion and token frequencies
//! - [`catalog`] and [`queries`]: the named analyses, one per artifact

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod derive;
pub mod error;
pub mod explode;
pub mod queries;
pub mod sort;

pub use aggregate::{
    Aggregate, AggregateValue, ExtremumMode, Group, Ranked, extremum, group_by, group_by_with, sum,
    top_n,
};
pub use catalog::{AnalysisFn, AnalysisOutcome, AnalysisSpec, QueryCatalog};
pub use config::CatalogConfig;
pub use derive::{
    DateParts, Number, NumericKind, cast_f64, cast_numeric, decompose_date, parse_f64, parse_i64,
    with_date_parts,
};
pub use error::{AnalysisError, Result};
pub use explode::{
    DEFAULT_DELIMITER, FrequencyCounter, TokenCount, explode, explode_and_count, explode_column,
};
pub use sort::{CompareOp, KeyKind, NumericPredicate, SortDirection, SortKey, filter, sort_by};
