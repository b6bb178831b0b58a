//! Seasonality metrics - calendar effects on weekly sales.

pub mod holiday_impact;
pub mod seasonal_index;

pub use holiday_impact::HolidayImpact;
pub use seasonal_index::SeasonalIndex;
