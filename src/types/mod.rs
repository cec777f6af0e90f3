//! Shared data structures for the plant operations estimator
//!
//! - OperatingInputs: caller-supplied operating parameters
//! - PredictionResult: output of the prediction collaborator
//! - DerivedMetrics: revenue / cost / profit in ₹ crore
//! - AdvisoryMessage: ordered operational suggestions
//! - PredictionRecord: one completed request, as kept in session history

mod operating;
mod advisory;
mod record;

pub use operating::*;
pub use advisory::*;
pub use record::*;
