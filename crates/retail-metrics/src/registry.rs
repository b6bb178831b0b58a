//! Metric registry for discovery and batch computation.
//!
//! The registry provides a centralized way to discover, instantiate, and
//! run metrics. `compute_all` runs every registered metric independently
//! and collects the named result tables into a [`ReportSet`].

use crate::{FactTable, Metric, MetricsError, ReportSet, Result};
use derive_more::Display;
use std::collections::HashMap;
use std::sync::Arc;

/// Metric category for grouping related analytics.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    /// Trend - period-over-period and smoothed series
    Trend,
    /// Ranking - ordinal position within a partition
    Ranking,
    /// Volatility - dispersion of the weekly series
    Volatility,
    /// Forecasting - simple forward projections
    Forecasting,
    /// Seasonality - calendar effects
    Seasonality,
    /// Concentration - Pareto-style share analysis
    Concentration,
    /// Macro - relationship to macro covariates
    Macro,
}

/// Metadata for metric introspection.
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric name (unique identifier and result-table name)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Metric category
    pub category: MetricCategory,
    /// Result-table columns in output order
    pub output_columns: Vec<String>,
}

/// Registry for metric discovery and batch computation.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: HashMap<String, Arc<dyn Metric>>,
}

impl MetricRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            metrics: HashMap::new(),
        }
    }

    /// Register all standard metrics.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Trend metrics
        registry.register(Arc::new(crate::trend::GrowthRate::default()));
        registry.register(Arc::new(crate::trend::MovingAverage::default()));

        // Ranking metrics
        registry.register(Arc::new(crate::ranking::StoreRanking::default()));

        // Volatility metrics
        registry.register(Arc::new(crate::volatility::SalesVolatility::default()));

        // Forecasting metrics
        registry.register(Arc::new(crate::forecast::NextMonthForecast::default()));

        // Seasonality metrics
        registry.register(Arc::new(crate::seasonality::SeasonalIndex::default()));
        registry.register(Arc::new(crate::seasonality::HolidayImpact::default()));

        // Concentration metrics
        registry.register(Arc::new(crate::concentration::AbcClassification::default()));

        // Macro metrics
        registry.register(Arc::new(crate::covariates::MacroCorrelation::default()));
        registry.register(Arc::new(crate::covariates::UnemploymentQuartiles::default()));

        registry
    }

    /// Register a metric in the registry.
    pub fn register(&mut self, metric: Arc<dyn Metric>) {
        self.metrics.insert(metric.name().to_string(), metric);
    }

    /// Get a metric by name.
    pub fn get(&self, name: &str) -> Option<&dyn Metric> {
        self.metrics.get(name).map(|m| m.as_ref())
    }

    /// Get a metric by name, erroring when it is not registered.
    pub fn require(&self, name: &str) -> Result<&dyn Metric> {
        self.get(name)
            .ok_or_else(|| MetricsError::NotFound(name.to_string()))
    }

    /// Get metrics by category.
    pub fn by_category(&self, category: MetricCategory) -> Vec<&dyn Metric> {
        self.metrics
            .values()
            .filter(|m| m.category() == category)
            .map(|m| m.as_ref())
            .collect()
    }

    /// Get all metric metadata.
    pub fn all_info(&self) -> Vec<MetricInfo> {
        self.metrics
            .values()
            .map(|m| MetricInfo {
                name: m.name().to_string(),
                description: m.description().to_string(),
                category: m.category(),
                output_columns: m.output_columns().iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }

    /// Get all metric names.
    pub fn names(&self) -> Vec<&str> {
        self.metrics.keys().map(|s| s.as_str()).collect()
    }

    /// Compute every registered metric over the fact table.
    ///
    /// Metrics run independently in deterministic (name) order; a failure
    /// in one is recorded in the report set and does not prevent the
    /// others from completing. The caller decides whether partial results
    /// are acceptable.
    pub fn compute_all(&self, facts: &FactTable) -> ReportSet {
        let mut reports = ReportSet::new();
        let mut names: Vec<&String> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let metric = &self.metrics[name];
            match metric.compute(facts) {
                Ok(table) => reports.insert(metric.name(), table),
                Err(error) => reports.record_failure(metric.name(), error),
            }
        }
        reports
    }

    /// Number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
