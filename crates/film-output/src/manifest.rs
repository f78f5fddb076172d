//! Run manifest: what was written, with checksums, and what failed.
//!
//! The manifest carries no timestamps, so an unchanged input produces a
//! byte-identical manifest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::writer::{ArtifactEntry, write_atomic};

pub const MANIFEST_FILE: &str = "manifest.json";

/// An analysis that produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// SHA-256 of the input file the artifacts were computed from.
    pub input_sha256: Option<String>,
    pub artifacts: Vec<ArtifactEntry>,
    pub failures: Vec<FailureEntry>,
}

impl Manifest {
    pub fn new(input_sha256: Option<String>) -> Self {
        Self {
            input_sha256,
            ..Self::default()
        }
    }

    pub fn record_artifact(&mut self, entry: ArtifactEntry) {
        self.artifacts.push(entry);
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: impl ToString) {
        self.failures.push(FailureEntry {
            name: name.into(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Atomically write `manifest` into `dir`, returning its path.
pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    write_atomic(&path, &manifest.to_json()?)?;
    Ok(path)
}
