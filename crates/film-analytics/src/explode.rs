//! Multi-value column explosion and token frequency counting.
//!
//! Exploding is a one-to-many stage: each row yields zero or more tokens,
//! and the [`FrequencyCounter`] consumes the flattened stream.

use std::collections::HashMap;

use film_model::Dataset;
use serde::Serialize;

/// Default separator of multi-value columns such as `cast` and `genres`.
pub const DEFAULT_DELIMITER: char = '|';

/// Split a packed value into trimmed, non-empty tokens. Duplicates are kept.
pub fn explode(raw: &str, delimiter: char) -> impl Iterator<Item = &str> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Every token of `column` across the dataset, in row then token order.
/// Rows without the column contribute nothing.
pub fn explode_column<'a>(
    dataset: &'a Dataset,
    column: &'a str,
    delimiter: char,
) -> impl Iterator<Item = &'a str> {
    dataset
        .iter()
        .filter_map(move |record| record.get(column))
        .flat_map(move |raw| explode(raw, delimiter))
}

/// A token and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Running per-token counts that remember first-seen order.
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    positions: HashMap<String, usize>,
    counts: Vec<TokenCount>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, token: &str) {
        if let Some(&index) = self.positions.get(token) {
            self.counts[index].count += 1;
            return;
        }
        self.positions.insert(token.to_string(), self.counts.len());
        self.counts.push(TokenCount {
            token: token.to_string(),
            count: 1,
        });
    }

    /// Total tokens observed.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Counts ordered by count descending; ties keep first-seen order.
    pub fn into_ranked(self) -> Vec<TokenCount> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }
}

impl<'a> Extend<&'a str> for FrequencyCounter {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, tokens: I) {
        for token in tokens {
            self.observe(token);
        }
    }
}

impl<'a> FromIterator<&'a str> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(tokens: I) -> Self {
        let mut counter = Self::new();
        counter.extend(tokens);
        counter
    }
}

/// Explode `column` and rank its tokens by frequency over the whole dataset.
pub fn explode_and_count(dataset: &Dataset, column: &str, delimiter: char) -> Vec<TokenCount> {
    explode_column(dataset, column, delimiter)
        .collect::<FrequencyCounter>()
        .into_ranked()
}
