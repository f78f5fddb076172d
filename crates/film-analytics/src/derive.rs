//! Per-row derived fields: numeric casts and release date decomposition.
//!
//! Nothing here fails. A value that cannot be interpreted becomes `None`
//! and each consumer applies its own null policy.

use film_model::columns::{RELEASE_DATE, RELEASE_DAY, RELEASE_MONTH};
use film_model::{Dataset, Record};

use crate::error::Result;

/// How a column is parsed by [`cast_numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// A successfully cast numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Parses a string as `f64`, returning `None` for empty, invalid, or
/// non-finite input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as `i64`, returning `None` for empty, invalid, or
/// out-of-range input.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Cast the raw value of `column` to a number. Missing columns and parse
/// failures both yield `None`.
pub fn cast_numeric(record: &Record, column: &str, kind: NumericKind) -> Option<Number> {
    let raw = record.get(column)?;
    match kind {
        NumericKind::Integer => parse_i64(raw).map(Number::Integer),
        NumericKind::Float => parse_f64(raw).map(Number::Float),
    }
}

/// Shorthand for a float cast, as used by every money and rating column.
pub fn cast_f64(record: &Record, column: &str) -> Option<f64> {
    cast_numeric(record, column, NumericKind::Float).map(Number::as_f64)
}

/// Month and day taken from a `M/D/YYYY` release date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateParts {
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Split `release_date` into month and day.
///
/// A missing separator nulls only the parts it would have delimited
/// (`"3"` keeps month 3). An empty segment between separators (`"12//2018"`)
/// marks the whole value malformed. Out-of-range parts are null. The year
/// is never taken from here; `release_year` is authoritative.
pub fn decompose_date(record: &Record) -> DateParts {
    record
        .get(RELEASE_DATE)
        .map(parse_date_parts)
        .unwrap_or_default()
}

/// Decompose a raw `M/D/YYYY` string. See [`decompose_date`].
pub fn parse_date_parts(raw: &str) -> DateParts {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DateParts::default();
    }
    let mut segments = trimmed.splitn(3, '/');
    let month = segments.next();
    let day = segments.next();
    let year = segments.next();

    let has_empty_segment = [month, day, year]
        .into_iter()
        .flatten()
        .any(|segment| segment.trim().is_empty());
    if has_empty_segment {
        return DateParts::default();
    }

    DateParts {
        month: month.and_then(|s| parse_part(s, 12)),
        day: day.and_then(|s| parse_part(s, 31)),
    }
}

fn parse_part(segment: &str, max: u32) -> Option<u32> {
    segment
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|value| (1..=max).contains(value))
}

/// A new dataset with `release_month` and `release_day` appended. Null
/// parts render as empty cells. Input columns of the same names are
/// replaced by the derived ones.
pub fn with_date_parts(dataset: &Dataset) -> Result<Dataset> {
    let derived_columns = [RELEASE_MONTH, RELEASE_DAY];
    let stripped;
    let source = if derived_columns.iter().any(|c| dataset.schema().contains(c)) {
        stripped = dataset.without_columns(&derived_columns)?;
        &stripped
    } else {
        dataset
    };
    let derived = source.with_columns(&derived_columns, |record| {
        let parts = decompose_date(record);
        vec![render_part(parts.month), render_part(parts.day)]
    })?;
    Ok(derived)
}

fn render_part(part: Option<u32>) -> String {
    part.map(|value| value.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use film_model::Schema;

    use super::*;

    fn record(column: &str, value: &str) -> Record {
        let schema = Schema::new([column]).unwrap();
        Dataset::from_rows(schema, vec![vec![value.to_string()]])
            .unwrap()
            .records()[0]
            .clone()
    }

    #[test]
    fn cast_numeric_trims_and_parses() {
        let r = record("budget", " 1500 ");
        assert_eq!(
            cast_numeric(&r, "budget", NumericKind::Integer),
            Some(Number::Integer(1500))
        );
        assert_eq!(cast_f64(&r, "budget"), Some(1500.0));
    }

    #[test]
    fn cast_numeric_failures_are_null() {
        assert_eq!(cast_f64(&record("revenue", ""), "revenue"), None);
        assert_eq!(cast_f64(&record("revenue", "n/a"), "revenue"), None);
        assert_eq!(cast_f64(&record("revenue", "1e400"), "revenue"), None);
        assert_eq!(cast_f64(&record("revenue", "NaN"), "revenue"), None);
        assert_eq!(
            cast_numeric(
                &record("count", "99999999999999999999"),
                "count",
                NumericKind::Integer
            ),
            None
        );
        assert_eq!(
            cast_numeric(&record("count", "7.5"), "count", NumericKind::Integer),
            None
        );
        assert_eq!(cast_f64(&record("revenue", "10"), "budget"), None);
    }

    #[test]
    fn decompose_well_formed_date() {
        assert_eq!(
            parse_date_parts("3/5/2019"),
            DateParts {
                month: Some(3),
                day: Some(5)
            }
        );
        assert_eq!(
            parse_date_parts("12/25/1999"),
            DateParts {
                month: Some(12),
                day: Some(25)
            }
        );
    }

    #[test]
    fn decompose_empty_segment_nulls_both_parts() {
        assert_eq!(parse_date_parts("12//2018"), DateParts::default());
        assert_eq!(parse_date_parts("/5/2018"), DateParts::default());
    }

    #[test]
    fn decompose_missing_separator_keeps_leading_parts() {
        assert_eq!(
            parse_date_parts("3"),
            DateParts {
                month: Some(3),
                day: None
            }
        );
        assert_eq!(
            parse_date_parts("3/5"),
            DateParts {
                month: Some(3),
                day: Some(5)
            }
        );
    }

    #[test]
    fn decompose_non_numeric_part_is_null_alone() {
        assert_eq!(
            parse_date_parts("Mar/5/2019"),
            DateParts {
                month: None,
                day: Some(5)
            }
        );
        assert_eq!(
            parse_date_parts("13/40/2019"),
            DateParts {
                month: None,
                day: None
            }
        );
    }

    #[test]
    fn decompose_date_reads_release_date_column() {
        let r = record(RELEASE_DATE, "7/4/1996");
        assert_eq!(decompose_date(&r).month, Some(7));
        assert_eq!(decompose_date(&record("other", "7/4/1996")), DateParts::default());
    }

    #[test]
    fn with_date_parts_appends_columns() {
        let schema = Schema::new([RELEASE_DATE]).unwrap();
        let dataset = Dataset::from_rows(
            schema,
            vec![vec!["3/5/2019".to_string()], vec!["12//2018".to_string()]],
        )
        .unwrap();
        let derived = with_date_parts(&dataset).unwrap();
        assert_eq!(
            derived.schema().columns(),
            [RELEASE_DATE, RELEASE_MONTH, RELEASE_DAY]
        );
        assert_eq!(derived.records()[0].get(RELEASE_MONTH), Some("3"));
        assert_eq!(derived.records()[0].get(RELEASE_DAY), Some("5"));
        assert_eq!(derived.records()[1].get(RELEASE_MONTH), Some(""));
    }

    #[test]
    fn with_date_parts_replaces_existing_derived_columns() {
        let schema = Schema::new([RELEASE_MONTH, RELEASE_DATE]).unwrap();
        let dataset =
            Dataset::from_rows(schema, vec![vec!["99".to_string(), "7/4/1996".to_string()]])
                .unwrap();
        let derived = with_date_parts(&dataset).unwrap();
        assert_eq!(
            derived.schema().columns(),
            [RELEASE_DATE, RELEASE_MONTH, RELEASE_DAY]
        );
        assert_eq!(derived.records()[0].get(RELEASE_MONTH), Some("7"));
        assert_eq!(derived.records()[0].get(RELEASE_DAY), Some("4"));
    }
}
