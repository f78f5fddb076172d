//! Artifact output for the film analytics batch.

pub mod error;
pub mod manifest;
pub mod writer;

pub use error::{OutputError, Result};
pub use manifest::{FailureEntry, MANIFEST_FILE, Manifest, write_manifest};
pub use writer::{
    ArtifactEntry, artifact_file_name, ensure_output_dir, render_csv, sha256_hex, write_artifact,
    write_atomic,
};
