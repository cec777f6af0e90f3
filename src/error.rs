//! Request-scoped error taxonomy
//!
//! - `InvalidInput`: a required numeric field is NaN or infinite. The request
//!   is rejected before anything is computed or recorded.
//! - `ModelUnavailable`: the prediction collaborator could not be loaded or
//!   invoked. No metrics are derived and no history entry is appended.
//! - `Export`: writing the flattened history failed.
//!
//! Out-of-domain values (PLF above 100%, negative receipts) are deliberately
//! absent: they are surfaced as advisories and computation proceeds.

use thiserror::Error;

/// Errors produced by the estimator pipeline.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("Invalid input: {field} must be a finite number (got {value})")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("Prediction model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl EstimatorError {
    /// Reject `value` unless it is finite.
    pub fn require_finite(field: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::InvalidInput { field, value })
        }
    }
}

impl From<csv::Error> for EstimatorError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<std::io::Error> for EstimatorError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(err.to_string())
    }
}
