#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/retaildynamics/retail-metrics/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod assemble;
pub mod concentration;
pub mod covariates;
pub mod error;
pub mod fact;
pub mod forecast;
pub mod ranking;
pub mod registry;
pub mod seasonality;
pub mod stats;
pub mod traits;
pub mod trend;
pub mod volatility;
pub mod window;

// Re-export core types
pub use assemble::ReportSet;
pub use error::{MetricsError, Result};
pub use fact::{FactTable, Observation};
pub use registry::{MetricCategory, MetricInfo, MetricRegistry};
pub use traits::{ConfigurableMetric, Metric, MetricConfig};
pub use window::Direction;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
