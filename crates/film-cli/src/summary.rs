use std::time::Duration;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use film_cli::types::{AnalysisStatus, AnalysisSummary, BatchResult};

pub fn print_summary(result: &BatchResult) {
    println!("Input: {}", result.input.display());
    println!("Rows loaded: {}", result.rows_loaded);
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.manifest {
        println!("Manifest: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Analysis"),
        header_cell("Description"),
        header_cell("Rows"),
        header_cell("Status"),
        header_cell("Time"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_rows = 0usize;
    let mut failed = 0usize;
    for summary in &result.analyses {
        total_rows += summary.rows.unwrap_or(0);
        if summary.status.is_failure() {
            failed += 1;
        }
        table.add_row(vec![
            Cell::new(summary.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.description),
            rows_cell(summary.rows),
            status_cell(&summary.status),
            dim_cell(format_elapsed(summary.elapsed)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} analyses", result.analyses.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        failed_cell(failed),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_failures(&result.analyses);
}

fn print_failures(analyses: &[AnalysisSummary]) {
    let failures: Vec<(&str, &str)> = analyses
        .iter()
        .filter_map(|summary| match &summary.status {
            AnalysisStatus::Failed(message) => Some((summary.name, message.as_str())),
            _ => None,
        })
        .collect();
    if failures.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for (name, message) in failures {
        eprintln!("- {name}: {message}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 2 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Percentage(75)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &AnalysisStatus) -> Cell {
    match status {
        AnalysisStatus::Written => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        AnalysisStatus::Computed => Cell::new("dry run").fg(Color::Green),
        AnalysisStatus::Failed(_) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        AnalysisStatus::Skipped => Cell::new("skipped").fg(Color::Yellow),
    }
}

fn rows_cell(rows: Option<usize>) -> Cell {
    match rows {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn failed_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(format!("{count} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("ok")
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        "<1ms".to_string()
    } else {
        format!("{ms:.0}ms")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
