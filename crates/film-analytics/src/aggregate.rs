//! Scalar, top-N, and grouped aggregates over numeric columns.
//!
//! Null policy differs by operation: sums treat null as zero, extremes and
//! averages skip nulls, rankings order nulls last.

use std::collections::HashMap;

use film_model::{Dataset, Record};
use tracing::debug;

use crate::derive::cast_f64;
use crate::sort::{SortDirection, compare_nulls_last};

/// Which end of the value range [`extremum`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumMode {
    Max,
    Min,
}

/// The first record, in dataset order, holding the largest or smallest
/// parsable value of `column`. `None` when no record has a value.
pub fn extremum<'a>(dataset: &'a Dataset, column: &str, mode: ExtremumMode) -> Option<&'a Record> {
    let mut best: Option<(&Record, f64)> = None;
    for record in dataset {
        let Some(value) = cast_f64(record, column) else {
            continue;
        };
        let replace = match best {
            None => true,
            Some((_, current)) => match mode {
                ExtremumMode::Max => value > current,
                ExtremumMode::Min => value < current,
            },
        };
        if replace {
            best = Some((record, value));
        }
    }
    best.map(|(record, _)| record)
}

/// Sum of `column`, counting null and unparsable values as zero.
pub fn sum(dataset: &Dataset, column: &str) -> f64 {
    let mut total = 0.0;
    let mut zeroed = 0usize;
    for record in dataset {
        match cast_f64(record, column) {
            Some(value) => total += value,
            None => zeroed += 1,
        }
    }
    if zeroed > 0 {
        debug!(column, zeroed, "unparsable values counted as zero");
    }
    total
}

/// A record paired with the derived key it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub record: &'a Record,
    pub key: Option<f64>,
}

/// The `n` records with the greatest derived key, descending. Null keys
/// rank last; ties keep load order. Returns fewer than `n` records when
/// the dataset is smaller.
pub fn top_n<F>(dataset: &Dataset, derive_key: F, n: usize) -> Vec<Ranked<'_>>
where
    F: Fn(&Record) -> Option<f64>,
{
    let mut ranked: Vec<Ranked<'_>> = dataset
        .iter()
        .map(|record| Ranked {
            record,
            key: derive_key(record),
        })
        .collect();
    ranked.sort_by(|a, b| {
        compare_nulls_last(a.key, b.key, SortDirection::Descending, f64::total_cmp)
    });
    ranked.truncate(n);
    ranked
}

/// An aggregate computed per group by [`group_by`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    /// Rows in the group.
    Count,
    /// Sum of a column, null counted as zero.
    Sum(String),
    /// Mean of a column over parsable values only.
    Average(String),
}

/// The result of one [`Aggregate`] for one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
    Count(usize),
    Sum(f64),
    /// `None` when no row in the group had a parsable value.
    Average(Option<f64>),
}

impl AggregateValue {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Count(n) => Some(n as f64),
            Self::Sum(v) => Some(v),
            Self::Average(v) => v,
        }
    }

    pub fn as_count(self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }
}

/// Rows sharing one key, with aggregate results in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub values: Vec<AggregateValue>,
}

#[derive(Debug, Clone, Copy)]
enum Accumulator<'a> {
    Count(usize),
    Sum { column: &'a str, total: f64 },
    Average { column: &'a str, total: f64, n: usize },
}

impl<'a> Accumulator<'a> {
    fn start(aggregate: &'a Aggregate) -> Self {
        match aggregate {
            Aggregate::Count => Self::Count(0),
            Aggregate::Sum(column) => Self::Sum { column, total: 0.0 },
            Aggregate::Average(column) => Self::Average {
                column,
                total: 0.0,
                n: 0,
            },
        }
    }

    fn observe(&mut self, record: &Record) {
        match self {
            Self::Count(n) => *n += 1,
            Self::Sum { column, total } => {
                *total += cast_f64(record, *column).unwrap_or(0.0);
            }
            Self::Average { column, total, n } => {
                if let Some(value) = cast_f64(record, *column) {
                    *total += value;
                    *n += 1;
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> AggregateValue {
        match self {
            Self::Count(n) => AggregateValue::Count(n),
            Self::Sum { total, .. } => AggregateValue::Sum(total),
            Self::Average { n: 0, .. } => AggregateValue::Average(None),
            Self::Average { total, n, .. } => AggregateValue::Average(Some(total / n as f64)),
        }
    }
}

/// Group records by exact raw value of `key_column` and compute
/// `aggregates` per group. Rows with an empty or missing key are left out.
/// Groups come back in first-seen order.
pub fn group_by(dataset: &Dataset, key_column: &str, aggregates: &[Aggregate]) -> Vec<Group> {
    group_by_with(
        dataset,
        |record| {
            record
                .get(key_column)
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string)
        },
        aggregates,
    )
}

/// Group records by the key `key_of` derives from each record. Records for
/// which it returns `None` are left out. Groups come back in first-seen
/// order.
pub fn group_by_with<F>(dataset: &Dataset, key_of: F, aggregates: &[Aggregate]) -> Vec<Group>
where
    F: Fn(&Record) -> Option<String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Accumulator>)> = Vec::new();
    let mut skipped = 0usize;

    for record in dataset {
        let Some(key) = key_of(record) else {
            skipped += 1;
            continue;
        };
        let index = match positions.get(&key) {
            Some(&index) => index,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, aggregates.iter().map(Accumulator::start).collect()));
                groups.len() - 1
            }
        };
        for accumulator in &mut groups[index].1 {
            accumulator.observe(record);
        }
    }
    debug!(groups = groups.len(), skipped, "grouped records");

    groups
        .into_iter()
        .map(|(key, accumulators)| Group {
            key,
            values: accumulators.into_iter().map(Accumulator::finish).collect(),
        })
        .collect()
}
