//! Next-month sales forecast.
//!
//! Projects each store's next month as the trailing 3-month moving average
//! at its most recent observed month, and reports the in-sample error of
//! that projection against the month's actual total. The error percentage
//! is null when the actual total is exactly 0.

use crate::stats::round_column;
use crate::{
    Result, aggregate,
    registry::MetricCategory,
    traits::{ConfigurableMetric, Metric},
    window,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the NextMonthForecast metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextMonthForecastConfig {
    /// Trailing window (in months) of the moving-average forecast.
    pub window_size: usize,
}

impl Default for NextMonthForecastConfig {
    fn default() -> Self {
        Self { window_size: 3 }
    }
}

/// Moving-average forecast of next month's sales per store.
///
/// # Output Columns
/// `store`, `year`, `month`, `actual_sales`, `forecast_next_month`,
/// `forecast_error`, `forecast_error_percent`
#[derive(Debug, Clone, Default)]
pub struct NextMonthForecast {
    config: NextMonthForecastConfig,
}

impl Metric for NextMonthForecast {
    fn name(&self) -> &str {
        "forecast_next_month"
    }

    fn description(&self) -> &str {
        "Trailing moving-average forecast of next month's sales per store"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Forecasting
    }

    fn output_columns(&self) -> &[&str] {
        &[
            "store",
            "year",
            "month",
            "actual_sales",
            "forecast_next_month",
            "forecast_error",
            "forecast_error_percent",
        ]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let monthly = aggregate::monthly_totals(facts)?;
        let smoothed = window::moving_average(
            &monthly,
            &["store"],
            &["year", "month"],
            "total_sales",
            self.config.window_size,
            "moving_avg",
        )?;
        // most recent month per store
        let mut latest = smoothed
            .lazy()
            .sort(
                ["store", "year", "month"],
                SortMultipleOptions::default()
                    .with_order_descending_multi([false, true, true])
                    .with_maintain_order(true),
            )
            .group_by_stable([col("store")])
            .agg([
                col("year").first(),
                col("month").first(),
                col("total_sales").first().alias("actual_sales"),
                col("moving_avg").first().alias("forecast_next_month"),
            ])
            .with_column(
                (col("forecast_next_month") - col("actual_sales")).alias("forecast_error"),
            )
            .with_column(
                when(col("actual_sales").neq(lit(0.0)))
                    .then(
                        lit(100.0) * (col("forecast_next_month") - col("actual_sales"))
                            / col("actual_sales"),
                    )
                    .otherwise(lit(NULL))
                    .alias("forecast_error_percent"),
            )
            .collect()?;
        round_column(&mut latest, "forecast_error", 2)?;
        round_column(&mut latest, "forecast_error_percent", 2)?;
        Ok(latest.select(self.output_columns().to_vec())?)
    }
}

impl ConfigurableMetric for NextMonthForecast {
    type Config = NextMonthForecastConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactTable, Observation};

    fn facts(rows: &[(i64, &str, f64)]) -> FactTable {
        let observations: Vec<Observation> = rows
            .iter()
            .map(|(store, date, sales)| Observation::new(*store, date.parse().unwrap(), *sales))
            .collect();
        FactTable::from_observations(&observations).unwrap()
    }

    #[test]
    fn test_forecast_uses_most_recent_month() {
        let facts = facts(&[
            (1, "2010-01-08", 100.0),
            (1, "2010-02-05", 110.0),
            (1, "2010-03-05", 121.0),
        ]);
        let out = NextMonthForecast::default().compute(&facts).unwrap();
        assert_eq!(out.height(), 1);
        let months: Vec<Option<i32>> =
            out.column("month").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(months, vec![Some(3)]);

        let forecast = out
            .column("forecast_next_month")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        let error = out
            .column("forecast_error")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        let error_pct = out
            .column("forecast_error_percent")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        // (100 + 110 + 121) / 3 = 110.33 against an actual of 121
        assert_eq!(forecast, 110.33);
        assert_eq!(error, -10.67);
        assert_eq!(error_pct, -8.82);
    }

    #[test]
    fn test_zero_actual_yields_null_error_percent() {
        let facts = facts(&[(1, "2010-01-08", 0.0)]);
        let out = NextMonthForecast::default().compute(&facts).unwrap();
        let error_pct: Vec<Option<f64>> = out
            .column("forecast_error_percent")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(error_pct, vec![None]);
    }
}
