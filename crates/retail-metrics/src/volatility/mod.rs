//! Volatility metrics - dispersion of the weekly sales series.

pub mod sales_volatility;

pub use sales_volatility::SalesVolatility;
