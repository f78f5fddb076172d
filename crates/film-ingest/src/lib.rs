//! Film dataset ingestion.
//!
//! Loading is all-or-nothing: any shape error aborts the load and no partial
//! dataset is returned.

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{IngestOptions, load_dataset, read_dataset, read_input};
