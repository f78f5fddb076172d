//! Delimited table reading with strict row shape.

use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord};
use film_model::{Dataset, Schema, columns::MOVIE_COLUMNS};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Options controlling how an input table is read.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Columns that must be present in the header.
    pub required_columns: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            required_columns: Vec::new(),
        }
    }
}

impl IngestOptions {
    /// Options requiring every column the movie analyses read.
    #[must_use]
    pub fn movies() -> Self {
        Self::default().with_required_columns(MOVIE_COLUMNS)
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Read the raw bytes of an input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Load a dataset from a file on disk.
pub fn load_dataset(path: &Path, options: &IngestOptions) -> Result<Dataset> {
    let bytes = read_input(path)?;
    read_dataset(bytes.as_slice(), path, options)
}

/// Read a dataset from any reader. `origin` names the source in errors.
///
/// Quoted fields may contain the delimiter. Every data row must have
/// exactly as many fields as the header.
pub fn read_dataset<R: Read>(input: R, origin: &Path, options: &IngestOptions) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(origin, &e))?
        .clone();
    if headers.is_empty() {
        return Err(IngestError::MissingHeader {
            path: origin.to_path_buf(),
        });
    }
    let schema = Schema::new(headers.iter().map(normalize_header)).map_err(|source| {
        IngestError::InvalidHeader {
            path: origin.to_path_buf(),
            source,
        }
    })?;

    let required: Vec<&str> = options
        .required_columns
        .iter()
        .map(String::as_str)
        .collect();
    let missing = schema.missing(&required);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing.into_iter().map(String::from).collect(),
        });
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => rows.push(record.iter().map(String::from).collect()),
            Ok(false) => break,
            Err(e) => return Err(csv_error(origin, &e)),
        }
    }
    debug!(path = %origin.display(), rows = rows.len(), "parsed data rows");

    let width = schema.len();
    let dataset = Dataset::from_rows(schema, rows).map_err(|source| IngestError::InvalidHeader {
        path: origin.to_path_buf(),
        source,
    })?;
    info!(
        path = %origin.display(),
        rows = dataset.len(),
        columns = width,
        "dataset loaded"
    );
    Ok(dataset)
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn csv_error(origin: &Path, error: &csv::Error) -> IngestError {
    match error.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => IngestError::RowWidth {
            path: origin.to_path_buf(),
            line: pos.as_ref().map_or(0, csv::Position::line),
            expected: usize::try_from(*expected_len).unwrap_or(usize::MAX),
            found: usize::try_from(*len).unwrap_or(usize::MAX),
        },
        _ => IngestError::CsvParse {
            path: origin.to_path_buf(),
            message: error.to_string(),
        },
    }
}
