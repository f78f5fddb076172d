//! The standard analyses, one per output artifact.
//!
//! Each is a pure function of the dataset and the catalog config.

use film_model::columns::{
    BUDGET, CAST, DIRECTOR, GENRES, ORIGINAL_TITLE, RELEASE_DATE, RELEASE_DAY, RELEASE_MONTH,
    RELEASE_YEAR, REVENUE, VOTE_AVERAGE, VOTE_COUNT,
};
use film_model::{Dataset, Record, Table, format_number};

use crate::aggregate::{
    Aggregate, AggregateValue, ExtremumMode, extremum, group_by, group_by_with, sum, top_n,
};
use crate::catalog::AnalysisSpec;
use crate::config::CatalogConfig;
use crate::derive::{NumericKind, cast_f64, parse_f64, parse_i64, with_date_parts};
use crate::error::{AnalysisError, Result};
use crate::explode::{FrequencyCounter, explode_and_count, explode_column};
use crate::sort::{NumericPredicate, SortKey, filter, sort_by};

pub const SORTED_BY_DATE: &str = "sorted-by-date";
pub const HIGH_RATING: &str = "high-rating";
pub const REVENUE_EXTREMES: &str = "revenue-extremes";
pub const TOTAL_REVENUE: &str = "total-revenue";
pub const TOP_PROFIT: &str = "top-profit";
pub const TOP_DIRECTOR: &str = "top-director";
pub const TOP_ACTOR: &str = "top-actor";
pub const GENRE_DISTRIBUTION: &str = "genre-distribution";
pub const YEARLY_ROLLUP: &str = "yearly-rollup";
pub const COLUMN_PROFILE: &str = "column-profile";

/// The standard catalog, in artifact order.
pub const STANDARD_ANALYSES: [AnalysisSpec; 10] = [
    AnalysisSpec {
        name: SORTED_BY_DATE,
        description: "All movies, newest release first",
        run: sorted_by_date,
    },
    AnalysisSpec {
        name: HIGH_RATING,
        description: "Movies rated above the threshold, best first",
        run: high_rating,
    },
    AnalysisSpec {
        name: REVENUE_EXTREMES,
        description: "Highest and lowest grossing movies",
        run: revenue_extremes,
    },
    AnalysisSpec {
        name: TOTAL_REVENUE,
        description: "Revenue summed over every movie",
        run: total_revenue,
    },
    AnalysisSpec {
        name: TOP_PROFIT,
        description: "Most profitable movies (revenue minus budget)",
        run: top_profit,
    },
    AnalysisSpec {
        name: TOP_DIRECTOR,
        description: "Director with the most movies",
        run: top_director,
    },
    AnalysisSpec {
        name: TOP_ACTOR,
        description: "Actor with the most appearances",
        run: top_actor,
    },
    AnalysisSpec {
        name: GENRE_DISTRIBUTION,
        description: "Movie count per genre",
        run: genre_distribution,
    },
    AnalysisSpec {
        name: YEARLY_ROLLUP,
        description: "Revenue, average rating, and movie count per release year",
        run: yearly_rollup,
    },
    AnalysisSpec {
        name: COLUMN_PROFILE,
        description: "Presence and numeric share of every input column",
        run: column_profile,
    },
];

fn require(dataset: &Dataset, analysis: &str, columns: &[&str]) -> Result<()> {
    match dataset.schema().missing(columns).first() {
        Some(column) => Err(AnalysisError::MissingColumn {
            analysis: analysis.to_string(),
            column: (*column).to_string(),
        }),
        None => Ok(()),
    }
}

/// Every column and row of `dataset`, verbatim.
fn dataset_table(dataset: &Dataset) -> Result<Table> {
    let mut table = Table::new(dataset.schema().columns().iter().cloned());
    for record in dataset {
        table.push_row(record.values().to_vec())?;
    }
    Ok(table)
}

fn count_cell(count: usize) -> String {
    count.to_string()
}

/// All rows plus `release_month`/`release_day`, ordered by
/// `(release_year, release_month, release_day)` descending, nulls last.
pub fn sorted_by_date(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    require(dataset, SORTED_BY_DATE, &[RELEASE_DATE, RELEASE_YEAR])?;
    let derived = with_date_parts(dataset)?;
    let sorted = sort_by(
        &derived,
        &[
            SortKey::numeric_desc(RELEASE_YEAR, NumericKind::Float),
            SortKey::numeric_desc(RELEASE_MONTH, NumericKind::Integer),
            SortKey::numeric_desc(RELEASE_DAY, NumericKind::Integer),
        ],
    );
    dataset_table(&sorted)
}

/// Rows with `vote_average` above the threshold, ordered by
/// `(vote_average, vote_count)` descending.
pub fn high_rating(dataset: &Dataset, config: &CatalogConfig) -> Result<Table> {
    require(dataset, HIGH_RATING, &[VOTE_AVERAGE, VOTE_COUNT])?;
    let predicate = NumericPredicate::greater_than(VOTE_AVERAGE, config.rating_threshold);
    let kept = filter(dataset, |record| predicate.matches(record));
    let sorted = sort_by(
        &kept,
        &[
            SortKey::numeric_desc(VOTE_AVERAGE, NumericKind::Float),
            SortKey::numeric_desc(VOTE_COUNT, NumericKind::Float),
        ],
    );
    dataset_table(&sorted)
}

pub fn revenue_extremes(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    require(dataset, REVENUE_EXTREMES, &[REVENUE])?;
    let columns = std::iter::once("revenue_rank".to_string())
        .chain(dataset.schema().columns().iter().cloned());
    let mut table = Table::new(columns);
    let picks = [
        ("highest", extremum(dataset, REVENUE, ExtremumMode::Max)),
        ("lowest", extremum(dataset, REVENUE, ExtremumMode::Min)),
    ];
    for (rank, record) in picks {
        let Some(record) = record else {
            continue;
        };
        let mut row = Vec::with_capacity(record.values().len() + 1);
        row.push(rank.to_string());
        row.extend(record.values().iter().cloned());
        table.push_row(row)?;
    }
    Ok(table)
}

pub fn total_revenue(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    require(dataset, TOTAL_REVENUE, &[REVENUE])?;
    let mut table = Table::new(["total_revenue"]);
    table.push_row(vec![format_number(Some(sum(dataset, REVENUE)))])?;
    Ok(table)
}

fn profit(record: &Record) -> Option<f64> {
    Some(cast_f64(record, REVENUE)? - cast_f64(record, BUDGET)?)
}

pub fn top_profit(dataset: &Dataset, config: &CatalogConfig) -> Result<Table> {
    require(dataset, TOP_PROFIT, &[ORIGINAL_TITLE, REVENUE, BUDGET])?;
    let mut table = Table::new([ORIGINAL_TITLE, "profit", REVENUE, BUDGET]);
    for ranked in top_n(dataset, profit, config.top_n) {
        table.push_row(vec![
            ranked.record.get(ORIGINAL_TITLE).unwrap_or_default().to_string(),
            format_number(ranked.key),
            format_number(cast_f64(ranked.record, REVENUE)),
            format_number(cast_f64(ranked.record, BUDGET)),
        ])?;
    }
    Ok(table)
}

/// The director with the most movies. Ties go to the director whose first
/// movie appears earliest in the dataset.
pub fn top_director(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    require(dataset, TOP_DIRECTOR, &[DIRECTOR])?;
    let mut table = Table::new([DIRECTOR, "movie_count"]);
    let mut best: Option<(String, usize)> = None;
    for group in group_by(dataset, DIRECTOR, &[Aggregate::Count]) {
        let count = group
            .values
            .first()
            .copied()
            .and_then(AggregateValue::as_count)
            .unwrap_or(0);
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((group.key, count));
        }
    }
    if let Some((director, count)) = best {
        table.push_row(vec![director, count_cell(count)])?;
    }
    Ok(table)
}

pub fn top_actor(dataset: &Dataset, config: &CatalogConfig) -> Result<Table> {
    require(dataset, TOP_ACTOR, &[CAST])?;
    let mut table = Table::new(["actor", "movie_count"]);
    let ranked = explode_and_count(dataset, CAST, config.multi_value_delimiter);
    if let Some(top) = ranked.into_iter().next() {
        table.push_row(vec![top.token, count_cell(top.count)])?;
    }
    Ok(table)
}

pub fn genre_distribution(dataset: &Dataset, config: &CatalogConfig) -> Result<Table> {
    require(dataset, GENRE_DISTRIBUTION, &[GENRES])?;
    let mut table = Table::new(["genre", "movie_count"]);
    let counter: FrequencyCounter =
        explode_column(dataset, GENRES, config.multi_value_delimiter).collect();
    for entry in counter.into_ranked() {
        table.push_row(vec![entry.token, count_cell(entry.count)])?;
    }
    Ok(table)
}

/// Per release year: summed revenue, mean rating, and movie count,
/// ascending by year. Rows are grouped by the integer value of
/// `release_year`, so `" 2015"` and `"2015"` share a row. Years that are
/// empty or not integers are left out.
pub fn yearly_rollup(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    require(dataset, YEARLY_ROLLUP, &[RELEASE_YEAR, REVENUE, VOTE_AVERAGE])?;
    let mut table = Table::new([RELEASE_YEAR, "total_revenue", "avg_rating", "movie_count"]);
    let groups = group_by_with(
        dataset,
        |record| {
            record
                .get(RELEASE_YEAR)
                .and_then(parse_i64)
                .map(|year| year.to_string())
        },
        &[
            Aggregate::Sum(REVENUE.to_string()),
            Aggregate::Average(VOTE_AVERAGE.to_string()),
            Aggregate::Count,
        ],
    );
    let mut years: Vec<(i64, _)> = groups
        .into_iter()
        .filter_map(|group| parse_i64(&group.key).map(|year| (year, group)))
        .collect();
    years.sort_by_key(|(year, _)| *year);

    for (_, group) in years {
        let value = |i: usize| group.values.get(i).copied();
        table.push_row(vec![
            group.key.clone(),
            format_number(value(0).and_then(AggregateValue::as_f64)),
            format_number(value(1).and_then(AggregateValue::as_f64)),
            count_cell(value(2).and_then(AggregateValue::as_count).unwrap_or(0)),
        ])?;
    }
    Ok(table)
}

/// Non-empty, empty, and numeric value counts for every input column, in
/// schema order.
pub fn column_profile(dataset: &Dataset, _config: &CatalogConfig) -> Result<Table> {
    let mut table = Table::new([
        "column",
        "non_empty_count",
        "empty_count",
        "empty_pct",
        "numeric_count",
    ]);
    let total = dataset.len();
    for (index, column) in dataset.schema().columns().iter().enumerate() {
        let mut non_empty = 0usize;
        let mut numeric = 0usize;
        for record in dataset {
            let value = &record.values()[index];
            if value.trim().is_empty() {
                continue;
            }
            non_empty += 1;
            if parse_f64(value).is_some() {
                numeric += 1;
            }
        }
        let empty = total - non_empty;
        #[allow(clippy::cast_precision_loss)]
        let empty_pct = if total == 0 {
            0.0
        } else {
            empty as f64 * 100.0 / total as f64
        };
        table.push_row(vec![
            column.clone(),
            count_cell(non_empty),
            count_cell(empty),
            format_number(Some(empty_pct)),
            count_cell(numeric),
        ])?;
    }
    Ok(table)
}
