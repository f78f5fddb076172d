use anyhow::Result;
use comfy_table::Table;
use film_analytics::{CatalogConfig, QueryCatalog};
use film_cli::batch::{BatchOptions, default_output_dir, delimiter_byte, run_batch};
use film_cli::config::load_catalog_config;
use film_cli::types::BatchResult;

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run_list() -> Result<()> {
    let catalog = QueryCatalog::standard(CatalogConfig::default());
    let mut table = Table::new();
    table.set_header(vec!["Analysis", "Description"]);
    apply_table_style(&mut table);
    for spec in catalog.specs() {
        table.add_row(vec![spec.name, spec.description]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_batch_command(args: &RunArgs) -> Result<BatchResult> {
    let options = BatchOptions {
        input: args.input.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.input)),
        config: load_catalog_config(args.config.as_deref())?,
        only: args.only.clone(),
        jobs: args.jobs.map(usize::from),
        delimiter: delimiter_byte(args.delimiter)?,
        require_movie_columns: !args.allow_missing_columns,
        dry_run: args.dry_run,
        fail_fast: args.fail_fast,
    };
    run_batch(&options)
}
