//! CSV rendering and atomic file writes.
//!
//! Artifacts are rendered fully in memory, written to a temporary file in
//! the destination directory, then renamed into place. A reader never sees
//! a partially written artifact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use film_model::Table;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{OutputError, Result};

/// One artifact as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub file: String,
    pub rows: usize,
    pub sha256: String,
}

/// Encode `table` as CSV with a header row.
pub fn render_csv(name: &str, table: &Table) -> Result<Vec<u8>> {
    let csv_error = |message: String| OutputError::Csv {
        name: name.to_string(),
        message,
    };
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|e| csv_error(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| csv_error(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| csv_error(e.to_string()))
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// File name of the artifact called `name`.
pub fn artifact_file_name(name: &str) -> String {
    format!("{name}.csv")
}

/// Create `dir` and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `path` through a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(bytes).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "file persisted");
    Ok(())
}

/// Render and atomically write one artifact into `dir`.
pub fn write_artifact(dir: &Path, name: &str, table: &Table) -> Result<ArtifactEntry> {
    let bytes = render_csv(name, table)?;
    let file = artifact_file_name(name);
    let path: PathBuf = dir.join(&file);
    write_atomic(&path, &bytes)?;
    info!(artifact = name, path = %path.display(), rows = table.height(), "artifact written");
    Ok(ArtifactEntry {
        name: name.to_string(),
        file,
        rows: table.height(),
        sha256: sha256_hex(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(columns.iter().copied());
        for row in rows {
            table
                .push_row(row.iter().map(|v| (*v).to_string()).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn render_quotes_fields_with_delimiters() {
        let t = table(
            &["original_title", "profit"],
            &[&["Crouching Tiger, Hidden Dragon", "196525736"]],
        );
        let csv = String::from_utf8(render_csv("top-profit", &t).unwrap()).unwrap();
        assert_eq!(
            csv,
            "original_title,profit\n\"Crouching Tiger, Hidden Dragon\",196525736\n"
        );
    }

    #[test]
    fn header_only_for_empty_table() {
        let t = table(&["director", "movie_count"], &[]);
        let csv = String::from_utf8(render_csv("top-director", &t).unwrap()).unwrap();
        assert_eq!(csv, "director,movie_count\n");
    }

    #[test]
    fn sha256_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
