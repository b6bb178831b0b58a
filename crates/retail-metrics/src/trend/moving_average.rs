//! Three-month moving average metric.
//!
//! Smooths each store's monthly sales totals over a trailing three-month
//! frame. Leading partial windows are averaged as-is: the first month of a
//! store equals its own total, the second averages two months.

use crate::{
    Result, aggregate,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the MovingAverage metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingAverageConfig {
    /// Number of months in the trailing frame, current month included.
    pub window_size: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self { window_size: 3 }
    }
}

/// Trailing moving average of per-store monthly sales totals.
///
/// # Output Columns
/// `store`, `year`, `month`, `total_sales`, `moving_avg_3m`
#[derive(Debug, Clone, Default)]
pub struct MovingAverage {
    config: MovingAverageConfig,
}

impl Metric for MovingAverage {
    fn name(&self) -> &str {
        "moving_avg_3m"
    }

    fn description(&self) -> &str {
        "Trailing 3-month moving average of per-store monthly sales totals"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Trend
    }

    fn output_columns(&self) -> &[&str] {
        &["store", "year", "month", "total_sales", "moving_avg_3m"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let monthly = aggregate::monthly_totals(facts)?;
        let smoothed = window::moving_average(
            &monthly,
            &["store"],
            &["year", "month"],
            "total_sales",
            self.config.window_size,
            "moving_avg_3m",
        )?;
        Ok(smoothed.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for MovingAverage {
    type Config = MovingAverageConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
