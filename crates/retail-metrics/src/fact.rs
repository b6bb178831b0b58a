//! The fact table: one immutable weekly observation per (store, date).
//!
//! Every metric reads the same validated snapshot. Validation happens once,
//! up front, so metric modules never have to re-check schema or nulls.

use crate::{MetricsError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// A single weekly observation for one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Store identifier
    pub store: i64,
    /// Week-ending date
    pub date: NaiveDate,
    /// Weekly sales total, non-negative
    pub weekly_sales: f64,
    /// Whether the week contains a holiday
    pub holiday_flag: bool,
    /// Average temperature for the week
    pub temperature: f64,
    /// Fuel price for the week
    pub fuel_price: f64,
    /// Regional unemployment rate
    pub unemployment: f64,
}

impl Observation {
    /// Create an observation with zeroed macro covariates.
    pub const fn new(store: i64, date: NaiveDate, weekly_sales: f64) -> Self {
        Self {
            store,
            date,
            weekly_sales,
            holiday_flag: false,
            temperature: 0.0,
            fuel_price: 0.0,
            unemployment: 0.0,
        }
    }

    /// Set the holiday flag.
    pub const fn with_holiday(mut self, holiday: bool) -> Self {
        self.holiday_flag = holiday;
        self
    }

    /// Set the temperature covariate.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the fuel price covariate.
    pub const fn with_fuel_price(mut self, fuel_price: f64) -> Self {
        self.fuel_price = fuel_price;
        self
    }

    /// Set the unemployment covariate.
    pub const fn with_unemployment(mut self, unemployment: f64) -> Self {
        self.unemployment = unemployment;
        self
    }
}

/// Validated, immutable snapshot of weekly observations.
///
/// Wraps a polars `DataFrame` with the canonical schema. Construction
/// fails with [`MetricsError::InvalidInput`] or
/// [`MetricsError::MissingColumn`] before any metric runs; after that,
/// metrics can assume the columns below exist with sane dtypes.
#[derive(Debug, Clone)]
pub struct FactTable {
    df: DataFrame,
}

impl FactTable {
    /// Columns every fact table must carry.
    pub const REQUIRED_COLUMNS: [&'static str; 11] = [
        "store",
        "date",
        "year",
        "month",
        "day",
        "iso_week",
        "weekly_sales",
        "holiday_flag",
        "temperature",
        "fuel_price",
        "unemployment",
    ];

    const INTEGER_COLUMNS: [&'static str; 5] = ["store", "year", "month", "day", "iso_week"];
    const FLOAT_COLUMNS: [&'static str; 4] =
        ["weekly_sales", "temperature", "fuel_price", "unemployment"];

    /// Validate a pre-built frame and wrap it.
    pub fn new(df: DataFrame) -> Result<Self> {
        Self::validate(&df)?;
        Ok(Self { df })
    }

    /// Build a fact table from observations, deriving the calendar columns
    /// (year, month, day, ISO week) from each date.
    pub fn from_observations(rows: &[Observation]) -> Result<Self> {
        if rows.is_empty() {
            return Err(MetricsError::InvalidInput(
                "no observations provided".to_string(),
            ));
        }
        let mut df = df![
            "store" => rows.iter().map(|r| r.store).collect::<Vec<_>>(),
            "year" => rows.iter().map(|r| r.date.year()).collect::<Vec<_>>(),
            "month" => rows.iter().map(|r| r.date.month() as i32).collect::<Vec<_>>(),
            "day" => rows.iter().map(|r| r.date.day() as i32).collect::<Vec<_>>(),
            "iso_week" => rows.iter().map(|r| r.date.iso_week().week() as i32).collect::<Vec<_>>(),
            "weekly_sales" => rows.iter().map(|r| r.weekly_sales).collect::<Vec<_>>(),
            "holiday_flag" => rows.iter().map(|r| r.holiday_flag).collect::<Vec<_>>(),
            "temperature" => rows.iter().map(|r| r.temperature).collect::<Vec<_>>(),
            "fuel_price" => rows.iter().map(|r| r.fuel_price).collect::<Vec<_>>(),
            "unemployment" => rows.iter().map(|r| r.unemployment).collect::<Vec<_>>(),
        ]?;
        df.with_column(date_series(
            "date",
            rows.iter().map(|r| r.date),
        ))?;
        Self::new(df)
    }

    /// The underlying frame.
    pub const fn df(&self) -> &DataFrame {
        &self.df
    }

    /// Number of observations.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    fn validate(df: &DataFrame) -> Result<()> {
        if df.height() == 0 {
            return Err(MetricsError::InvalidInput("fact table is empty".to_string()));
        }
        for name in Self::REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(MetricsError::MissingColumn(name.to_string()));
            }
        }
        for name in Self::INTEGER_COLUMNS {
            if !df.column(name)?.dtype().is_integer() {
                return Err(MetricsError::InvalidInput(format!(
                    "column '{name}' must be an integer type, got {}",
                    df.column(name)?.dtype()
                )));
            }
        }
        for name in Self::FLOAT_COLUMNS {
            if !matches!(
                df.column(name)?.dtype(),
                DataType::Float32 | DataType::Float64
            ) {
                return Err(MetricsError::InvalidInput(format!(
                    "column '{name}' must be a float type, got {}",
                    df.column(name)?.dtype()
                )));
            }
        }
        let holiday_dtype = df.column("holiday_flag")?.dtype();
        if !(holiday_dtype == &DataType::Boolean || holiday_dtype.is_integer()) {
            return Err(MetricsError::InvalidInput(format!(
                "column 'holiday_flag' must be boolean or integer, got {holiday_dtype}"
            )));
        }
        if df.column("weekly_sales")?.null_count() > 0 {
            return Err(MetricsError::InvalidInput(
                "column 'weekly_sales' contains nulls".to_string(),
            ));
        }
        // one observation per (store, date)
        let duplicates = df
            .clone()
            .lazy()
            .group_by([col("store"), col("date")])
            .agg([col("weekly_sales").len().alias("n_rows")])
            .filter(col("n_rows").gt(lit(1u32)))
            .collect()?;
        if duplicates.height() > 0 {
            return Err(MetricsError::InvalidInput(format!(
                "{} duplicated (store, date) combinations",
                duplicates.height()
            )));
        }
        Ok(())
    }
}

/// Build a polars date column from chrono dates.
pub(crate) fn date_series(name: &str, dates: impl Iterator<Item = NaiveDate>) -> Series {
    let epoch = NaiveDate::default();
    let days: Vec<i32> = dates.map(|d| (d - epoch).num_days() as i32).collect();
    Int32Chunked::from_vec(name.into(), days)
        .into_date()
        .into_series()
}
