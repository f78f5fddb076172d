//! Catalog configuration file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use film_analytics::CatalogConfig;

/// Read catalog parameters from a TOML file, or the defaults when no file
/// is given.
pub fn load_catalog_config(path: Option<&Path>) -> Result<CatalogConfig> {
    let Some(path) = path else {
        return Ok(CatalogConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let config: CatalogConfig =
        toml::from_str(&text).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(config)
}
