//! Monthly, yearly and whole-period aggregation of the fact table.
//!
//! Collapses weekly observations into the totals the windowed metrics
//! consume. A (store, period) combination with no observations is simply
//! absent; callers must not assume contiguous months.

use crate::stats::round_column;
use crate::{FactTable, Result};
use polars::prelude::*;

/// Per-(store, year, month) sales totals, rounded to 2 decimals and sorted
/// by (store, year, month).
pub fn monthly_totals(facts: &FactTable) -> Result<DataFrame> {
    let mut totals = facts
        .df()
        .clone()
        .lazy()
        .group_by([col("store"), col("year"), col("month")])
        .agg([col("weekly_sales").sum().alias("total_sales")])
        .sort(
            ["store", "year", "month"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    round_column(&mut totals, "total_sales", 2)?;
    Ok(totals)
}

/// Per-(store, year) sales totals, rounded to 2 decimals and sorted by
/// (store, year).
pub fn yearly_totals(facts: &FactTable) -> Result<DataFrame> {
    let mut totals = facts
        .df()
        .clone()
        .lazy()
        .group_by([col("store"), col("year")])
        .agg([col("weekly_sales").sum().alias("yearly_sales")])
        .sort(
            ["store", "year"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    round_column(&mut totals, "yearly_sales", 2)?;
    Ok(totals)
}

/// Per-store sales totals over the whole snapshot, rounded to 2 decimals
/// and sorted by store.
pub fn store_totals(facts: &FactTable) -> Result<DataFrame> {
    let mut totals = facts
        .df()
        .clone()
        .lazy()
        .group_by([col("store")])
        .agg([col("weekly_sales").sum().alias("total_sales")])
        .sort(
            ["store"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    round_column(&mut totals, "total_sales", 2)?;
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Observation;

    fn facts(rows: &[(i64, &str, f64)]) -> FactTable {
        let observations: Vec<Observation> = rows
            .iter()
            .map(|(store, date, sales)| Observation::new(*store, date.parse().unwrap(), *sales))
            .collect();
        FactTable::from_observations(&observations).unwrap()
    }

    #[test]
    fn test_monthly_totals_groups_and_rounds() {
        let facts = facts(&[
            (1, "2010-01-08", 100.114),
            (1, "2010-01-15", 200.0),
            (1, "2010-02-05", 50.0),
            (2, "2010-01-08", 10.0),
        ]);
        let totals = monthly_totals(&facts).unwrap();
        assert_eq!(totals.height(), 3);
        let sales: Vec<Option<f64>> = totals
            .column("total_sales")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        // sorted by (store, year, month)
        assert_eq!(sales, vec![Some(300.11), Some(50.0), Some(10.0)]);
    }

    #[test]
    fn test_absent_months_stay_absent() {
        // store 1 has January and March but no February
        let facts = facts(&[(1, "2010-01-08", 100.0), (1, "2010-03-05", 120.0)]);
        let totals = monthly_totals(&facts).unwrap();
        assert_eq!(totals.height(), 2);
        let months: Vec<Option<i32>> = totals
            .column("month")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(months, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_yearly_and_store_totals() {
        let facts = facts(&[
            (1, "2010-06-04", 100.0),
            (1, "2011-06-03", 150.0),
            (2, "2010-06-04", 40.0),
        ]);
        let yearly = yearly_totals(&facts).unwrap();
        assert_eq!(yearly.height(), 3);
        let per_store = store_totals(&facts).unwrap();
        assert_eq!(per_store.height(), 2);
        let sales: Vec<Option<f64>> = per_store
            .column("total_sales")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(sales, vec![Some(250.0), Some(40.0)]);
    }
}
