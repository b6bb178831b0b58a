//! ABC classification of stores by total revenue.
//!
//! Stores are ordered best-seller first and classified by cumulative share
//! of the grand total: A up to 80%, B up to 95%, C beyond. Both boundaries
//! are inclusive in the lower class, evaluated on the rounded cumulative
//! percentage.

use crate::stats::round_column;
use crate::{
    Direction, MetricsError, Result, aggregate,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the AbcClassification metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcClassificationConfig {
    /// Cumulative share (%) up to which stores are class A.
    pub a_cutoff: f64,
    /// Cumulative share (%) up to which stores are class B.
    pub b_cutoff: f64,
}

impl Default for AbcClassificationConfig {
    fn default() -> Self {
        Self {
            a_cutoff: 80.0,
            b_cutoff: 95.0,
        }
    }
}

/// Pareto classification of stores by share of total sales.
///
/// # Output Columns
/// `store`, `total_sales`, `pct_of_total`, `cumulative_pct`, `abc_category`
#[derive(Debug, Clone, Default)]
pub struct AbcClassification {
    config: AbcClassificationConfig,
}

impl Metric for AbcClassification {
    fn name(&self) -> &str {
        "abc_analysis"
    }

    fn description(&self) -> &str {
        "ABC (Pareto) classification of stores by cumulative share of sales"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Concentration
    }

    fn output_columns(&self) -> &[&str] {
        &[
            "store",
            "total_sales",
            "pct_of_total",
            "cumulative_pct",
            "abc_category",
        ]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        if self.config.a_cutoff > self.config.b_cutoff {
            return Err(MetricsError::InvalidInput(format!(
                "A cutoff {} exceeds B cutoff {}",
                self.config.a_cutoff, self.config.b_cutoff
            )));
        }
        let totals = aggregate::store_totals(facts)?;
        let shared = window::running_total_share(
            &totals,
            "total_sales",
            Direction::Descending,
            "total_sales",
            "running_total",
            "cumulative_pct",
        )?;
        let grand_total = shared
            .column("total_sales")?
            .f64()?
            .sum()
            .unwrap_or(0.0);
        let mut classified = shared
            .lazy()
            .with_column(
                when(lit(grand_total).neq(lit(0.0)))
                    .then(lit(100.0) * col("total_sales") / lit(grand_total))
                    .otherwise(lit(NULL))
                    .alias("pct_of_total"),
            )
            .with_column(
                when(col("cumulative_pct").lt_eq(lit(self.config.a_cutoff)))
                    .then(lit("A"))
                    .when(col("cumulative_pct").lt_eq(lit(self.config.b_cutoff)))
                    .then(lit("B"))
                    .otherwise(lit("C"))
                    .alias("abc_category"),
            )
            .collect()?;
        round_column(&mut classified, "pct_of_total", 2)?;
        Ok(classified.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for AbcClassification {
    type Config = AbcClassificationConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
