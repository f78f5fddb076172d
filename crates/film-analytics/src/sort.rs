//! Stable multi-key ordering and predicate-based row selection.

use std::cmp::Ordering;

use film_model::{Dataset, Record};

use crate::derive::{NumericKind, cast_numeric};

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How a key column is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Compare by cast value; unparsable values are null.
    Numeric(NumericKind),
    /// Compare raw strings; empty values are null.
    Text,
}

/// One column of a multi-key ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
    pub kind: KeyKind,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection, kind: KeyKind) -> Self {
        Self {
            column: column.into(),
            direction,
            kind,
        }
    }

    pub fn numeric_desc(column: impl Into<String>, kind: NumericKind) -> Self {
        Self::new(column, SortDirection::Descending, KeyKind::Numeric(kind))
    }

    pub fn numeric_asc(column: impl Into<String>, kind: NumericKind) -> Self {
        Self::new(column, SortDirection::Ascending, KeyKind::Numeric(kind))
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self.kind {
            KeyKind::Numeric(kind) => {
                let left = cast_numeric(a, &self.column, kind).map(|n| n.as_f64());
                let right = cast_numeric(b, &self.column, kind).map(|n| n.as_f64());
                compare_nulls_last(left, right, self.direction, f64::total_cmp)
            }
            KeyKind::Text => {
                let left = a.get(&self.column).filter(|v| !v.trim().is_empty());
                let right = b.get(&self.column).filter(|v| !v.trim().is_empty());
                compare_nulls_last(left, right, self.direction, |x, y| x.cmp(y))
            }
        }
    }
}

/// Compare two optional values in `direction`, placing `None` after every
/// `Some` regardless of direction.
pub fn compare_nulls_last<T, F>(
    left: Option<T>,
    right: Option<T>,
    direction: SortDirection,
    cmp: F,
) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (left, right) {
        (Some(l), Some(r)) => match direction {
            SortDirection::Ascending => cmp(&l, &r),
            SortDirection::Descending => cmp(&r, &l),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two records key by key; the first non-equal key decides.
pub fn compare_records(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// A new dataset ordered by `keys`. Full ties keep load order.
pub fn sort_by(dataset: &Dataset, keys: &[SortKey]) -> Dataset {
    let records = dataset.records();
    let mut order: Vec<usize> = (0..records.len()).collect();
    // slice::sort_by is stable
    order.sort_by(|&i, &j| compare_records(&records[i], &records[j], keys));
    dataset.subset(&order)
}

/// A new dataset holding the records for which `predicate` holds, in load
/// order.
pub fn filter<P>(dataset: &Dataset, predicate: P) -> Dataset
where
    P: Fn(&Record) -> bool,
{
    let kept: Vec<usize> = dataset
        .iter()
        .enumerate()
        .filter(|(_, record)| predicate(record))
        .map(|(index, _)| index)
        .collect();
    dataset.subset(&kept)
}

/// Comparison operator of a [`NumericPredicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
}

/// `column <op> threshold` over a float cast. Rows whose value does not
/// parse never match.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericPredicate {
    pub column: String,
    pub op: CompareOp,
    pub threshold: f64,
}

impl NumericPredicate {
    pub fn new(column: impl Into<String>, op: CompareOp, threshold: f64) -> Self {
        Self {
            column: column.into(),
            op,
            threshold,
        }
    }

    pub fn greater_than(column: impl Into<String>, threshold: f64) -> Self {
        Self::new(column, CompareOp::Greater, threshold)
    }

    pub fn matches(&self, record: &Record) -> bool {
        let Some(value) = cast_numeric(record, &self.column, NumericKind::Float) else {
            return false;
        };
        let value = value.as_f64();
        match self.op {
            CompareOp::Greater => value > self.threshold,
            CompareOp::GreaterOrEqual => value >= self.threshold,
            CompareOp::Less => value < self.threshold,
            CompareOp::LessOrEqual => value <= self.threshold,
            #[allow(clippy::float_cmp)]
            CompareOp::Equal => value == self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use film_model::Schema;

    use super::*;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        let schema = Schema::new(columns.iter().copied()).unwrap();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| (*v).to_string()).collect())
            .collect();
        Dataset::from_rows(schema, rows).unwrap()
    }

    fn column<'a>(dataset: &'a Dataset, name: &str) -> Vec<&'a str> {
        dataset.iter().filter_map(|r| r.get(name)).collect()
    }

    #[test]
    fn descending_sort_places_nulls_last() {
        let ds = dataset(
            &["id", "score"],
            &[&["a", ""], &["b", "2"], &["c", "x"], &["d", "9"]],
        );
        let sorted = sort_by(&ds, &[SortKey::numeric_desc("score", NumericKind::Float)]);
        assert_eq!(column(&sorted, "id"), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn ascending_sort_places_nulls_last() {
        let ds = dataset(
            &["id", "score"],
            &[&["a", ""], &["b", "2"], &["c", "x"], &["d", "9"]],
        );
        let sorted = sort_by(&ds, &[SortKey::numeric_asc("score", NumericKind::Float)]);
        assert_eq!(column(&sorted, "id"), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn ties_fall_through_then_keep_load_order() {
        let ds = dataset(
            &["id", "major", "minor"],
            &[
                &["a", "1", "5"],
                &["b", "2", "1"],
                &["c", "1", "7"],
                &["d", "1", "5"],
            ],
        );
        let sorted = sort_by(
            &ds,
            &[
                SortKey::numeric_desc("major", NumericKind::Integer),
                SortKey::numeric_desc("minor", NumericKind::Integer),
            ],
        );
        assert_eq!(column(&sorted, "id"), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn numeric_keys_compare_by_value_not_text() {
        let ds = dataset(&["n"], &[&["9"], &["10"], &["100"]]);
        let sorted = sort_by(&ds, &[SortKey::numeric_desc("n", NumericKind::Integer)]);
        assert_eq!(column(&sorted, "n"), vec!["100", "10", "9"]);
    }

    #[test]
    fn text_keys_treat_empty_as_null() {
        let ds = dataset(&["name"], &[&[""], &["beta"], &["alpha"]]);
        let sorted = sort_by(
            &ds,
            &[SortKey::new("name", SortDirection::Descending, KeyKind::Text)],
        );
        assert_eq!(column(&sorted, "name"), vec!["beta", "alpha", ""]);
    }

    #[test]
    fn filter_excludes_unparsable_values() {
        let ds = dataset(
            &["id", "vote_average"],
            &[&["a", "8.1"], &["b", "n/a"], &["c", "7.5"], &["d", "9"]],
        );
        let predicate = NumericPredicate::greater_than("vote_average", 7.5);
        let kept = filter(&ds, |r| predicate.matches(r));
        assert_eq!(column(&kept, "id"), vec!["a", "d"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn compare_ops() {
        let ds = dataset(&["v"], &[&["5"]]);
        let record = &ds.records()[0];
        assert!(NumericPredicate::new("v", CompareOp::GreaterOrEqual, 5.0).matches(record));
        assert!(NumericPredicate::new("v", CompareOp::LessOrEqual, 5.0).matches(record));
        assert!(NumericPredicate::new("v", CompareOp::Equal, 5.0).matches(record));
        assert!(!NumericPredicate::new("v", CompareOp::Less, 5.0).matches(record));
        assert!(!NumericPredicate::new("missing", CompareOp::Less, 9.0).matches(record));
    }
}
