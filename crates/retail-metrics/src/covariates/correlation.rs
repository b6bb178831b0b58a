//! Per-store correlation between weekly sales and macro covariates.
//!
//! Pearson correlation of weekly sales against temperature, fuel price and
//! unemployment, per store. A correlation that is undefined (fewer than two
//! paired points, or a constant series) is a null, never a NaN.

use crate::stats::{pearson, round3};
use crate::{MetricsError, Result, registry::MetricCategory, traits::Metric, window};
use polars::prelude::*;

/// Pearson correlation of weekly sales with each macro covariate.
///
/// # Output Columns
/// `store`, `corr_temperature`, `corr_fuel_price`, `corr_unemployment`
#[derive(Debug, Clone, Default)]
pub struct MacroCorrelation;

impl Metric for MacroCorrelation {
    fn name(&self) -> &str {
        "correlation_macro"
    }

    fn description(&self) -> &str {
        "Per-store Pearson correlation of weekly sales with macro covariates"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Macro
    }

    fn output_columns(&self) -> &[&str] {
        &[
            "store",
            "corr_temperature",
            "corr_fuel_price",
            "corr_unemployment",
        ]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let sorted = window::stable_sort(facts.df(), &["store"], &[false])?;
        let sales = float_column(&sorted, "weekly_sales")?;
        let temperature = float_column(&sorted, "temperature")?;
        let fuel_price = float_column(&sorted, "fuel_price")?;
        let unemployment = float_column(&sorted, "unemployment")?;
        let store_ids = sorted.column("store")?.cast(&DataType::Int64)?;
        let store_ids = store_ids.i64()?;

        let mut stores = Vec::new();
        let mut corr_temperature = Vec::new();
        let mut corr_fuel_price = Vec::new();
        let mut corr_unemployment = Vec::new();
        for (start, end) in window::partition_bounds(&sorted, &["store"])? {
            let store = store_ids
                .get(start)
                .ok_or_else(|| MetricsError::Computation {
                    metric: self.name().to_string(),
                    detail: format!("null store id at row {start}"),
                })?;
            stores.push(store);
            corr_temperature.push(paired_pearson(&sales[start..end], &temperature[start..end]));
            corr_fuel_price.push(paired_pearson(&sales[start..end], &fuel_price[start..end]));
            corr_unemployment.push(paired_pearson(
                &sales[start..end],
                &unemployment[start..end],
            ));
        }

        Ok(df![
            "store" => stores,
            "corr_temperature" => corr_temperature,
            "corr_fuel_price" => corr_fuel_price,
            "corr_unemployment" => corr_unemployment,
        ]?)
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let values = casted.f64()?.into_iter().collect();
    Ok(values)
}

/// Pearson over the rows where both series are present, rounded to 3
/// decimals.
fn paired_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut paired_x = Vec::with_capacity(xs.len());
    let mut paired_y = Vec::with_capacity(ys.len());
    for (x, y) in xs.iter().zip(ys) {
        if let (Some(x), Some(y)) = (x, y) {
            paired_x.push(*x);
            paired_y.push(*y);
        }
    }
    pearson(&paired_x, &paired_y).map(round3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactTable, Observation};

    #[test]
    fn test_perfect_and_inverse_correlation() {
        let observations = vec![
            Observation::new(1, "2010-01-08".parse().unwrap(), 10.0)
                .with_temperature(30.0)
                .with_fuel_price(4.0)
                .with_unemployment(8.0),
            Observation::new(1, "2010-01-15".parse().unwrap(), 20.0)
                .with_temperature(40.0)
                .with_fuel_price(3.0)
                .with_unemployment(8.0),
            Observation::new(1, "2010-01-22".parse().unwrap(), 30.0)
                .with_temperature(50.0)
                .with_fuel_price(2.0)
                .with_unemployment(8.0),
        ];
        let facts = FactTable::from_observations(&observations).unwrap();
        let out = MacroCorrelation.compute(&facts).unwrap();
        assert_eq!(out.height(), 1);

        let temp = out.column("corr_temperature").unwrap().f64().unwrap().get(0);
        let fuel = out.column("corr_fuel_price").unwrap().f64().unwrap().get(0);
        let unemp: Vec<Option<f64>> = out
            .column("corr_unemployment")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(temp, Some(1.0));
        assert_eq!(fuel, Some(-1.0));
        // constant unemployment series is undefined, not NaN
        assert_eq!(unemp, vec![None]);
    }

    #[test]
    fn test_single_observation_store_is_null() {
        let observations = vec![
            Observation::new(1, "2010-01-08".parse().unwrap(), 10.0).with_temperature(30.0),
        ];
        let facts = FactTable::from_observations(&observations).unwrap();
        let out = MacroCorrelation.compute(&facts).unwrap();
        let temp: Vec<Option<f64>> = out
            .column("corr_temperature")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(temp, vec![None]);
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut observations = Vec::new();
        for week in 0..10 {
            let date = format!("2010-01-{:02}", week + 1);
            observations.push(
                Observation::new(1, date.parse().unwrap(), 100.0 + (week as f64) * 3.7)
                    .with_temperature(35.0 + (week as f64).sin() * 10.0)
                    .with_fuel_price(2.5 + (week as f64) * 0.01)
                    .with_unemployment(7.0 - (week as f64) * 0.05),
            );
        }
        let facts = FactTable::from_observations(&observations).unwrap();
        let out = MacroCorrelation.compute(&facts).unwrap();
        for name in ["corr_temperature", "corr_fuel_price", "corr_unemployment"] {
            for value in out.column(name).unwrap().f64().unwrap().into_iter().flatten() {
                assert!(value.is_finite());
                assert!((-1.0..=1.0).contains(&value));
            }
        }
    }
}
