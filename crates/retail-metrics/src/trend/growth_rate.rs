//! Month-over-month growth rate metric.
//!
//! For each store, the percentage change of the monthly sales total against
//! the previous month: `(total_t - total_{t-1}) / total_{t-1} * 100`.
//!
//! The first month of each store has no prior period and reports a null
//! growth value, as does any month whose prior total is exactly 0.

use crate::{
    Result, aggregate,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the GrowthRate metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthRateConfig {
    /// Number of months to look back. Default is 1 (month-over-month);
    /// use 12 for year-over-year comparison of the same calendar month.
    pub lag: usize,
}

impl Default for GrowthRateConfig {
    fn default() -> Self {
        Self { lag: 1 }
    }
}

/// Month-over-month sales growth per store.
///
/// # Output Columns
/// `store`, `year`, `month`, `total_sales`, `mom_growth_percent`
#[derive(Debug, Clone, Default)]
pub struct GrowthRate {
    config: GrowthRateConfig,
}

impl Metric for GrowthRate {
    fn name(&self) -> &str {
        "growth_rate"
    }

    fn description(&self) -> &str {
        "Month-over-month growth of per-store monthly sales totals (%)"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Trend
    }

    fn output_columns(&self) -> &[&str] {
        &["store", "year", "month", "total_sales", "mom_growth_percent"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let monthly = aggregate::monthly_totals(facts)?;
        let with_growth = window::lag_delta(
            &monthly,
            &["store"],
            &["year", "month"],
            "total_sales",
            self.config.lag,
            "mom_growth_percent",
        )?;
        Ok(with_growth.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for GrowthRate {
    type Config = GrowthRateConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
