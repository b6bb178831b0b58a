//! Per-store sales volatility.
//!
//! Sample standard deviation (ddof = 1) and mean of the weekly sales
//! series, plus the number of observed weeks. A store with a single week
//! has undefined volatility and reports null, not zero; a constant series
//! with two or more weeks has a defined volatility of 0.0.

use crate::stats::round_column;
use crate::{
    Result,
    registry::MetricCategory,
    traits::Metric,
    window,
};
use polars::prelude::*;

/// Weekly sales dispersion per store, most volatile stores first.
///
/// # Output Columns
/// `store`, `sales_volatility`, `avg_sales`, `weeks_count`
#[derive(Debug, Clone, Default)]
pub struct SalesVolatility;

impl Metric for SalesVolatility {
    fn name(&self) -> &str {
        "sales_volatility"
    }

    fn description(&self) -> &str {
        "Sample standard deviation and mean of weekly sales per store"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Volatility
    }

    fn output_columns(&self) -> &[&str] {
        &["store", "sales_volatility", "avg_sales", "weeks_count"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let mut per_store = facts
            .df()
            .clone()
            .lazy()
            .group_by([col("store")])
            .agg([
                col("weekly_sales").std(1).alias("sales_volatility"),
                col("weekly_sales").mean().alias("avg_sales"),
                col("weekly_sales").len().alias("weeks_count"),
            ])
            .sort(
                ["store"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        round_column(&mut per_store, "sales_volatility", 2)?;
        round_column(&mut per_store, "avg_sales", 2)?;
        // most volatile first; undefined volatilities sort last
        let ordered = window::stable_sort(&per_store, &["sales_volatility"], &[true])?;
        Ok(ordered.select(self.output_columns().to_vec())?)
    }
}
