//! Store ranking by yearly revenue.
//!
//! Competitive rank within each year: stores with equal yearly totals share
//! a rank, and the rank after a tie-group jumps by the group's size.

use crate::{
    Direction, Result, aggregate,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the StoreRanking metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRankingConfig {
    /// Rank ascending instead of the default best-seller-first order.
    pub ascending: bool,
}

/// Yearly store ranking by total sales.
///
/// # Output Columns
/// `store`, `year`, `yearly_sales`, `sales_rank`
#[derive(Debug, Clone, Default)]
pub struct StoreRanking {
    config: StoreRankingConfig,
}

impl Metric for StoreRanking {
    fn name(&self) -> &str {
        "store_ranking"
    }

    fn description(&self) -> &str {
        "Competitive rank of stores within each year by yearly sales"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Ranking
    }

    fn output_columns(&self) -> &[&str] {
        &["store", "year", "yearly_sales", "sales_rank"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let direction = if self.config.ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        };
        let yearly = aggregate::yearly_totals(facts)?;
        let ranked = window::rank(&yearly, &["year"], "yearly_sales", direction, "sales_rank")?;
        let ordered = window::stable_sort(&ranked, &["year", "sales_rank"], &[false, false])?;
        Ok(ordered.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for StoreRanking {
    type Config = StoreRankingConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
