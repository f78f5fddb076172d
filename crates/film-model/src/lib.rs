//! Data model for the film analytics engine.
//!
//! A [`Dataset`] is loaded once and never mutated; analyses read it and
//! produce [`Table`]s.

pub mod dataset;
pub mod error;
pub mod schema;
pub mod table;

pub use dataset::{Dataset, Record};
pub use error::{ModelError, Result};
pub use schema::{Schema, columns};
pub use table::{Table, format_number};
