use serde::{Deserialize, Serialize};

use crate::explode::DEFAULT_DELIMITER;

/// Tunable parameters of the standard analyses. Every field has a default,
/// so a partial config file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Rows kept by the top-profit ranking.
    pub top_n: usize,
    /// Strict lower bound on `vote_average` for the high-rating filter.
    pub rating_threshold: f64,
    /// Separator of the `cast` and `genres` columns.
    pub multi_value_delimiter: char,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            rating_threshold: 7.5,
            multi_value_delimiter: DEFAULT_DELIMITER,
        }
    }
}
