//! Immutable row storage for one loaded input snapshot.

use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::schema::Schema;

/// One input row: raw string values keyed by the shared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Record {
    /// Raw value of `column`, or `None` when the schema has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema
            .position(column)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Ordered records sharing one schema. Load order is the tie-break baseline
/// for every stable ordering applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from raw rows. Every row must match the schema width;
    /// the first offending row (1-based) is reported.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<String>>) -> Result<Self> {
        let schema = Arc::new(schema);
        let expected = schema.len();
        let mut records = Vec::with_capacity(rows.len());
        for (index, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(ModelError::RowWidth {
                    row: index + 1,
                    expected,
                    found: values.len(),
                });
            }
            records.push(Record {
                schema: Arc::clone(&schema),
                values,
            });
        }
        Ok(Self { schema, records })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A new dataset holding the records at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }

    /// A new dataset without the named columns. Names the schema lacks are
    /// ignored.
    pub fn without_columns(&self, columns: &[&str]) -> Result<Self> {
        let kept: Vec<usize> = (0..self.schema.len())
            .filter(|&index| {
                !columns
                    .iter()
                    .any(|column| self.schema.position(column) == Some(index))
            })
            .collect();
        let schema = Schema::new(kept.iter().map(|&index| self.schema.columns()[index].clone()))?;
        let rows = self
            .records
            .iter()
            .map(|record| kept.iter().map(|&index| record.values[index].clone()).collect())
            .collect();
        Self::from_rows(schema, rows)
    }

    /// A new dataset with `extra` columns appended; `derive` supplies the
    /// values of the extra columns for each record.
    pub fn with_columns<F>(&self, extra: &[&str], derive: F) -> Result<Self>
    where
        F: Fn(&Record) -> Vec<String>,
    {
        let schema = self.schema.extended(extra.iter().copied())?;
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut values = record.values.clone();
                values.extend(derive(record));
                values
            })
            .collect();
        Self::from_rows(schema, rows)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
