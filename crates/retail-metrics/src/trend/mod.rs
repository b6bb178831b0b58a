//! Trend metrics - period-over-period change and smoothed series.

pub mod growth_rate;
pub mod moving_average;

pub use growth_rate::{GrowthRate, GrowthRateConfig};
pub use moving_average::{MovingAverage, MovingAverageConfig};
