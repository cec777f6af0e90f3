//! Plant Advisor: generation, emissions and financial estimates for one plant
//!
//! Turns a plant's operating parameters into point estimates of power
//! generated, CO₂ emitted, revenue, fuel cost and profit, plus rule-based
//! operational suggestions.
//!
//! ## Architecture
//!
//! - **Model**: `Predictor` seam plus a linear model loaded from a JSON artifact
//! - **Metrics Deriver**: predicted generation → revenue, cost, profit (₹ crore)
//! - **Advisory Engine**: ordered threshold rule table with dedup, cap and fallback
//! - **Estimator**: validate → predict → derive → advise, single or batch
//! - **Session / Export / Notify**: per-session history, CSV export, outbound handoff

pub mod advisory;
pub mod config;
pub mod error;
pub mod estimator;
pub mod export;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod report;
pub mod session;
pub mod types;

// Re-export plant configuration
pub use config::PlantConfig;

// Re-export commonly used types
pub use types::{
    AdvisoryCategory, AdvisoryMessage, DerivedMetrics, Domain, DomainViolation, OperatingInputs,
    PredictionRecord, PredictionResult,
};

pub use advisory::{AdvisoryContext, Rule, RuleTable};
pub use error::EstimatorError;
pub use estimator::Estimator;
pub use metrics::derive_metrics;
pub use model::{FeatureVector, LinearModel, Predictor, FEATURE_NAMES, TARGET_NAMES};
pub use notify::{NotificationPayload, Notifier, TracingNotifier};
pub use session::SessionHistory;
