//! Core trait definitions for metrics.
//!
//! All metrics implement the [`Metric`] trait, which provides a unified
//! interface for deriving a named result table from the fact table.

use crate::{FactTable, MetricCategory, Result};
use polars::prelude::*;

/// An analytic that derives one result table from the fact table.
///
/// Metrics are pure functions of an immutable snapshot: they never mutate
/// the fact table or each other's output, so they may run in any order or
/// concurrently.
pub trait Metric: Send + Sync + std::fmt::Debug {
    /// Unique identifier, used as the result-table name.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Human-readable description of what this metric measures.
    fn description(&self) -> &str;

    /// Metric category for grouping and discovery.
    fn category(&self) -> MetricCategory;

    /// Columns of the result table, in output order.
    fn output_columns(&self) -> &[&str];

    /// Compute the result table.
    ///
    /// Undefined values (no prior period, zero denominator, insufficient
    /// sample) appear as nulls in the output, never as errors.
    fn compute(&self, facts: &FactTable) -> Result<DataFrame>;
}

/// Marker trait for metric configuration types.
///
/// All config types should implement Default, Clone, Send, Sync, and Debug.
pub trait MetricConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// A metric that supports runtime configuration.
///
/// Extends [`Metric`] to allow customization of window sizes, lag offsets,
/// classification cutoffs, and other parameters.
pub trait ConfigurableMetric: Metric {
    /// Configuration type for this metric.
    type Config: MetricConfig;

    /// Create a new metric with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> MetricConfig for T {}
