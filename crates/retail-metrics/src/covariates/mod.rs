//! Macro covariate metrics - how weekly sales relate to temperature,
//! fuel price and unemployment.

pub mod correlation;
pub mod unemployment_quartiles;

pub use correlation::MacroCorrelation;
pub use unemployment_quartiles::{UnemploymentQuartiles, UnemploymentQuartilesConfig};
