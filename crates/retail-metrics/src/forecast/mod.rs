//! Forecasting metrics - simple forward projections.

pub mod next_month;

pub use next_month::{NextMonthForecast, NextMonthForecastConfig};
