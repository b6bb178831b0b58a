//! Error types for metric computations.
//!
//! Only structural failures are errors. A metric value that is mathematically
//! undefined for a row (no prior period, zero denominator, insufficient
//! sample) is a null in that row's output column, never an `Err`.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while validating input or computing metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Fact table is empty, malformed, or an operation parameter is invalid
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Metric not found in registry
    #[error("Metric not found: {0}")]
    NotFound(String),

    /// Internal invariant violation, tagged with the offending metric
    #[error("Computation error in '{metric}': {detail}")]
    Computation {
        /// Name of the metric that failed
        metric: String,
        /// What went wrong
        detail: String,
    },

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error at the ingestion or persistence edge
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
