//! Sales by unemployment quartile.
//!
//! Stores are bucketed into quartiles of their average unemployment rate;
//! each quartile reports the average weekly sales across its stores'
//! observations and the number of distinct stores it contains.

use crate::stats::round_column;
use crate::{
    Result,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the UnemploymentQuartiles metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnemploymentQuartilesConfig {
    /// Number of buckets to split stores into.
    pub num_buckets: usize,
}

impl Default for UnemploymentQuartilesConfig {
    fn default() -> Self {
        Self { num_buckets: 4 }
    }
}

/// Average weekly sales per unemployment quartile of stores.
///
/// # Output Columns
/// `unemployment_quartile`, `avg_sales_in_quartile`, `num_stores`
#[derive(Debug, Clone, Default)]
pub struct UnemploymentQuartiles {
    config: UnemploymentQuartilesConfig,
}

impl Metric for UnemploymentQuartiles {
    fn name(&self) -> &str {
        "unemployment_quartiles"
    }

    fn description(&self) -> &str {
        "Average weekly sales of stores grouped by unemployment quartile"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Macro
    }

    fn output_columns(&self) -> &[&str] {
        &["unemployment_quartile", "avg_sales_in_quartile", "num_stores"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let mut per_store = facts
            .df()
            .clone()
            .lazy()
            .group_by([col("store")])
            .agg([col("unemployment").mean().alias("avg_unemployment")])
            .sort(
                ["store"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        round_column(&mut per_store, "avg_unemployment", 2)?;

        let bucketed = window::quantile_bucket(
            &per_store,
            "avg_unemployment",
            self.config.num_buckets,
            "unemployment_quartile",
        )?;

        let mut grouped = facts
            .df()
            .clone()
            .lazy()
            .join(
                bucketed
                    .lazy()
                    .select([col("store"), col("unemployment_quartile")]),
                [col("store")],
                [col("store")],
                JoinArgs::new(JoinType::Inner),
            )
            .group_by([col("unemployment_quartile")])
            .agg([
                col("weekly_sales").mean().alias("avg_sales_in_quartile"),
                col("store").n_unique().alias("num_stores"),
            ])
            .sort(
                ["unemployment_quartile"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        round_column(&mut grouped, "avg_sales_in_quartile", 2)?;
        Ok(grouped.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for UnemploymentQuartiles {
    type Config = UnemploymentQuartilesConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
