//! Column layout shared by every record of a dataset.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ModelError, Result};

/// Ordered, uniquely named columns, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    columns: Vec<String>,
    #[serde(skip)]
    positions: BTreeMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting empty or duplicated column names.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut positions = BTreeMap::new();
        for (index, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(ModelError::EmptyColumnName { index });
            }
            if positions.insert(column.clone(), index).is_some() {
                return Err(ModelError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Columns from `required` that this schema lacks, in the order given.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|column| !self.contains(column))
            .collect()
    }

    /// A new schema with `extra` appended after the existing columns.
    pub fn extended<I, S>(&self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = self
            .columns
            .iter()
            .cloned()
            .chain(extra.into_iter().map(Into::into));
        Self::new(columns)
    }
}

/// Column names of the movie input table.
pub mod columns {
    pub const ORIGINAL_TITLE: &str = "original_title";
    pub const CAST: &str = "cast";
    pub const DIRECTOR: &str = "director";
    pub const GENRES: &str = "genres";
    pub const BUDGET: &str = "budget";
    pub const REVENUE: &str = "revenue";
    pub const RELEASE_DATE: &str = "release_date";
    pub const RELEASE_YEAR: &str = "release_year";
    pub const VOTE_AVERAGE: &str = "vote_average";
    pub const VOTE_COUNT: &str = "vote_count";

    /// Derived from `release_date`.
    pub const RELEASE_MONTH: &str = "release_month";
    /// Derived from `release_date`.
    pub const RELEASE_DAY: &str = "release_day";

    /// Every column the movie analyses read.
    pub const MOVIE_COLUMNS: [&str; 10] = [
        ORIGINAL_TITLE,
        CAST,
        DIRECTOR,
        GENRES,
        BUDGET,
        REVENUE,
        RELEASE_DATE,
        RELEASE_YEAR,
        VOTE_AVERAGE,
        VOTE_COUNT,
    ];
}
