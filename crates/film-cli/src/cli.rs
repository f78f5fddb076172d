//! CLI argument definitions for the film analytics batch.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "film-stats",
    version,
    about = "Film dataset analytics - derive a fixed catalog of reports from one movie table",
    long_about = "Load one delimited movie table and derive a fixed catalog of CSV artifacts:\n\
                  release-date ordering, rating filters, revenue and profit rankings,\n\
                  director/actor/genre frequencies, and a per-year rollup."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis catalog over a movie table and write its artifacts.
    Run(RunArgs),

    /// List the analyses in the catalog.
    List,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the input table (CSV with a header row).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for artifacts (default: <INPUT dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML file overriding catalog parameters (top_n, rating_threshold,
    /// multi_value_delimiter).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run only the named analysis (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Number of worker threads for the analyses (default: one per core).
    #[arg(long = "jobs", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Field delimiter of the input table.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: char,

    /// Load tables that lack some of the standard movie columns; analyses
    /// needing an absent column fail individually.
    #[arg(long = "allow-missing-columns")]
    pub allow_missing_columns: bool,

    /// Compute every analysis and report, without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Stop writing artifacts after the first failed analysis.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
