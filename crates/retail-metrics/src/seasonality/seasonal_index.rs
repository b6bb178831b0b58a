//! Seasonality index by calendar month.
//!
//! The ratio of each calendar month's average weekly sales (across all
//! years and stores) to the overall average. An index above 1.0 marks a
//! seasonally strong month.

use crate::stats::{round2, round_column};
use crate::{MetricsError, Result, registry::MetricCategory, traits::Metric};
use polars::prelude::*;

/// Average sales per calendar month relative to the overall average.
///
/// # Output Columns
/// `month`, `avg_sales_month`, `overall_avg_sales`, `seasonal_index`
#[derive(Debug, Clone, Default)]
pub struct SeasonalIndex;

impl Metric for SeasonalIndex {
    fn name(&self) -> &str {
        "seasonal_index"
    }

    fn description(&self) -> &str {
        "Ratio of each calendar month's average sales to the overall average"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Seasonality
    }

    fn output_columns(&self) -> &[&str] {
        &["month", "avg_sales_month", "overall_avg_sales", "seasonal_index"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let overall = facts
            .df()
            .column("weekly_sales")?
            .f64()?
            .mean()
            .ok_or_else(|| MetricsError::Computation {
                metric: self.name().to_string(),
                detail: "weekly_sales has no values".to_string(),
            })?;
        let overall = round2(overall);

        let mut monthly = facts
            .df()
            .clone()
            .lazy()
            .group_by([col("month")])
            .agg([col("weekly_sales").mean().alias("avg_sales_month")])
            .sort(
                ["month"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        round_column(&mut monthly, "avg_sales_month", 2)?;

        let mut indexed = monthly
            .lazy()
            .with_column(lit(overall).alias("overall_avg_sales"))
            .with_column(
                when(lit(overall).neq(lit(0.0)))
                    .then(col("avg_sales_month") / lit(overall))
                    .otherwise(lit(NULL))
                    .alias("seasonal_index"),
            )
            .collect()?;
        round_column(&mut indexed, "seasonal_index", 3)?;
        Ok(indexed.select(self.output_columns().to_vec())?)
    }
}
