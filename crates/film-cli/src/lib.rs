//! Library side of the `film-stats` batch runner.

#![allow(missing_docs)]

pub mod batch;
pub mod config;
pub mod logging;
pub mod types;
