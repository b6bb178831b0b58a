//! Concentration metrics - Pareto-style share analysis.

pub mod abc;

pub use abc::{AbcClassification, AbcClassificationConfig};
