//! Holiday versus regular week comparison.
//!
//! Week counts and average weekly sales split by the holiday flag.

use crate::stats::round_column;
use crate::{Result, registry::MetricCategory, traits::Metric};
use polars::prelude::*;

/// Week counts and average sales for holiday and regular weeks.
///
/// # Output Columns
/// `holiday_flag`, `weeks_count`, `avg_sales`
#[derive(Debug, Clone, Default)]
pub struct HolidayImpact;

impl Metric for HolidayImpact {
    fn name(&self) -> &str {
        "holiday_impact"
    }

    fn description(&self) -> &str {
        "Week counts and average weekly sales for holiday vs regular weeks"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Seasonality
    }

    fn output_columns(&self) -> &[&str] {
        &["holiday_flag", "weeks_count", "avg_sales"]
    }

    fn compute(&self, facts: &crate::FactTable) -> Result<DataFrame> {
        let mut grouped = facts
            .df()
            .clone()
            .lazy()
            .group_by([col("holiday_flag")])
            .agg([
                col("weekly_sales").len().alias("weeks_count"),
                col("weekly_sales").mean().alias("avg_sales"),
            ])
            .sort(
                ["holiday_flag"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        round_column(&mut grouped, "avg_sales", 2)?;
        Ok(grouped.select(self.output_columns().to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactTable, Observation};

    #[test]
    fn test_holiday_weeks_split() {
        let observations = vec![
            Observation::new(1, "2010-01-08".parse().unwrap(), 100.0),
            Observation::new(1, "2010-01-15".parse().unwrap(), 120.0),
            Observation::new(1, "2010-02-12".parse().unwrap(), 300.0).with_holiday(true),
        ];
        let facts = FactTable::from_observations(&observations).unwrap();
        let out = HolidayImpact.compute(&facts).unwrap();

        let flags: Vec<Option<bool>> = out
            .column("holiday_flag")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        let weeks: Vec<Option<u32>> = out
            .column("weeks_count")
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .collect();
        let avg: Vec<Option<f64>> = out
            .column("avg_sales")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(flags, vec![Some(false), Some(true)]);
        assert_eq!(weeks, vec![Some(2), Some(1)]);
        assert_eq!(avg, vec![Some(110.0), Some(300.0)]);
    }
}
