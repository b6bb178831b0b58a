//! CSV ingestion: parse a raw weekly-sales export into a fact table.
//!
//! The export carries one row per (store, week) with a `%d-%m-%Y` date.
//! Calendar attributes (year, month, day, ISO week) are derived here, so
//! the core only ever sees a fully-populated fact table.

use chrono::NaiveDate;
use polars::prelude::*;
use retail_metrics::{FactTable, MetricsError, Observation, Result};
use std::path::Path;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Load a weekly sales CSV into a validated [`FactTable`].
///
/// Expected columns: `Store`, `Date`, `Weekly_Sales`, `Holiday_Flag`,
/// `Temperature`, `Fuel_Price`, `Unemployment`.
pub fn load_csv(path: &Path) -> Result<FactTable> {
    if !path.exists() {
        return Err(MetricsError::InvalidInput(format!(
            "input file not found: {}",
            path.display()
        )));
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    let observations = observations_from(&df)?;
    FactTable::from_observations(&observations)
}

fn observations_from(df: &DataFrame) -> Result<Vec<Observation>> {
    let stores = integer_column(df, "Store")?;
    let dates = string_column(df, "Date")?;
    let sales = float_column(df, "Weekly_Sales")?;
    let holidays = integer_column(df, "Holiday_Flag")?;
    let temperatures = float_column(df, "Temperature")?;
    let fuel_prices = float_column(df, "Fuel_Price")?;
    let unemployment = float_column(df, "Unemployment")?;

    let mut observations = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let date_str = dates.get(i).ok_or_else(|| null_cell("Date", i))?;
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
            MetricsError::InvalidInput(format!("row {i}: unparseable date '{date_str}': {e}"))
        })?;
        observations.push(
            Observation::new(
                stores.get(i).ok_or_else(|| null_cell("Store", i))?,
                date,
                sales.get(i).ok_or_else(|| null_cell("Weekly_Sales", i))?,
            )
            .with_holiday(holidays.get(i).ok_or_else(|| null_cell("Holiday_Flag", i))? != 0)
            .with_temperature(temperatures.get(i).ok_or_else(|| null_cell("Temperature", i))?)
            .with_fuel_price(fuel_prices.get(i).ok_or_else(|| null_cell("Fuel_Price", i))?)
            .with_unemployment(unemployment.get(i).ok_or_else(|| null_cell("Unemployment", i))?),
        );
    }
    Ok(observations)
}

fn integer_column(df: &DataFrame, name: &str) -> Result<Int64Chunked> {
    let casted = required(df, name)?
        .cast(&DataType::Int64)
        .map_err(|_| not_numeric(name))?;
    Ok(casted.i64()?.clone())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let casted = required(df, name)?
        .cast(&DataType::Float64)
        .map_err(|_| not_numeric(name))?;
    Ok(casted.f64()?.clone())
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let casted = required(df, name)?.cast(&DataType::String)?;
    Ok(casted.str()?.clone())
}

fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| MetricsError::MissingColumn(name.to_string()))
}

fn not_numeric(name: &str) -> MetricsError {
    MetricsError::InvalidInput(format!("column '{name}' is not numeric"))
}

fn null_cell(name: &str, row: usize) -> MetricsError {
    MetricsError::InvalidInput(format!("row {row}: null value in column '{name}'"))
}
