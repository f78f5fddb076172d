//! Registry of named analyses run against one loaded dataset.
//!
//! Analyses share nothing mutable, so [`QueryCatalog::run_all`] executes them
//! in parallel and a failure in one leaves the others untouched.

use std::time::{Duration, Instant};

use film_model::{Dataset, Table};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, info_span, warn};

use crate::config::CatalogConfig;
use crate::error::{AnalysisError, Result};
use crate::queries::STANDARD_ANALYSES;

/// Signature shared by every analysis.
pub type AnalysisFn = fn(&Dataset, &CatalogConfig) -> Result<Table>;

/// A named analysis producing one artifact.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub run: AnalysisFn,
}

/// Result of running one analysis.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub name: &'static str,
    pub result: Result<Table>,
    pub elapsed: Duration,
}

impl AnalysisOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct QueryCatalog {
    specs: Vec<AnalysisSpec>,
    config: CatalogConfig,
}

impl QueryCatalog {
    /// An empty catalog.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            specs: Vec::new(),
            config,
        }
    }

    /// Every standard analysis, in artifact order.
    pub fn standard(config: CatalogConfig) -> Self {
        let mut catalog = Self::new(config);
        for spec in STANDARD_ANALYSES {
            catalog.register(spec);
        }
        catalog
    }

    /// Add an analysis, replacing any registered under the same name.
    pub fn register(&mut self, spec: AnalysisSpec) {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn specs(&self) -> &[AnalysisSpec] {
        &self.specs
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&AnalysisSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// A catalog restricted to `names`, keeping registry order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        for name in names {
            let name = name.as_ref();
            if self.get(name).is_none() {
                return Err(self.unknown(name));
            }
        }
        let specs = self
            .specs
            .iter()
            .filter(|spec| names.iter().any(|name| name.as_ref() == spec.name))
            .copied()
            .collect();
        Ok(Self {
            specs,
            config: self.config.clone(),
        })
    }

    /// Run the analysis registered under `name`.
    pub fn run(&self, name: &str, dataset: &Dataset) -> Result<Table> {
        let spec = self.get(name).ok_or_else(|| self.unknown(name))?;
        self.execute(spec, dataset).result
    }

    /// Run every registered analysis in parallel. Outcomes come back in
    /// registry order.
    pub fn run_all(&self, dataset: &Dataset) -> Vec<AnalysisOutcome> {
        self.specs
            .par_iter()
            .map(|spec| self.execute(spec, dataset))
            .collect()
    }

    fn execute(&self, spec: &AnalysisSpec, dataset: &Dataset) -> AnalysisOutcome {
        let span = info_span!("analysis", name = spec.name);
        let _guard = span.enter();
        let start = Instant::now();
        let result = (spec.run)(dataset, &self.config);
        let elapsed = start.elapsed();
        match &result {
            Ok(table) => info!(
                rows = table.height(),
                duration_ms = elapsed.as_millis(),
                "analysis complete"
            ),
            Err(error) => warn!(%error, "analysis failed"),
        }
        AnalysisOutcome {
            name: spec.name,
            result,
            elapsed,
        }
    }

    fn unknown(&self, name: &str) -> AnalysisError {
        AnalysisError::UnknownAnalysis {
            name: name.to_string(),
            available: self.names().into_iter().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use film_model::Schema;

    use super::*;

    fn failing(_: &Dataset, _: &CatalogConfig) -> Result<Table> {
        Err(AnalysisError::MissingColumn {
            analysis: "failing".to_string(),
            column: "nope".to_string(),
        })
    }

    fn row_count(dataset: &Dataset, _: &CatalogConfig) -> Result<Table> {
        let mut table = Table::new(["rows"]);
        table.push_row(vec![dataset.len().to_string()])?;
        Ok(table)
    }

    fn tiny() -> Dataset {
        let schema = Schema::new(["a"]).unwrap();
        Dataset::from_rows(schema, vec![vec!["1".to_string()]]).unwrap()
    }

    #[test]
    fn standard_catalog_lists_artifacts_in_order() {
        let catalog = QueryCatalog::standard(CatalogConfig::default());
        assert_eq!(
            catalog.names(),
            vec![
                "sorted-by-date",
                "high-rating",
                "revenue-extremes",
                "total-revenue",
                "top-profit",
                "top-director",
                "top-actor",
                "genre-distribution",
                "yearly-rollup",
                "column-profile",
            ]
        );
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let mut catalog = QueryCatalog::new(CatalogConfig::default());
        catalog.register(AnalysisSpec {
            name: "failing",
            description: "always fails",
            run: failing,
        });
        catalog.register(AnalysisSpec {
            name: "rows",
            description: "row count",
            run: row_count,
        });
        let outcomes = catalog.run_all(&tiny());
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_ok());
        assert_eq!(outcomes[1].name, "rows");
        let table = outcomes[1].result.as_ref().unwrap();
        assert_eq!(table.cell(0, "rows"), Some("1"));
    }

    #[test]
    fn select_keeps_registry_order_and_rejects_unknown_names() {
        let catalog = QueryCatalog::standard(CatalogConfig::default());
        let selected = catalog.select(&["top-actor", "total-revenue"]).unwrap();
        assert_eq!(selected.names(), vec!["total-revenue", "top-actor"]);

        let err = catalog.select(&["box-office"]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::UnknownAnalysis { ref name, .. } if name == "box-office"
        ));
        assert!(err.to_string().contains("genre-distribution"));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut catalog = QueryCatalog::new(CatalogConfig::default());
        catalog.register(AnalysisSpec {
            name: "x",
            description: "first",
            run: failing,
        });
        catalog.register(AnalysisSpec {
            name: "x",
            description: "second",
            run: row_count,
        });
        assert_eq!(catalog.len(), 1);
        assert!(catalog.run("x", &tiny()).is_ok());
        assert!(catalog.run("y", &tiny()).is_err());
    }
}
