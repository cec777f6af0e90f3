//! Prediction collaborator: feature schema and the `Predictor` seam
//!
//! The model consumes exactly seven features in a fixed order and produces
//! two targets. The order is a contract shared with whatever produced the
//! model artifact; `LinearModel::load` refuses artifacts that disagree.

mod artifact;

pub use artifact::{LinearModel, ModelArtifact, ARTIFACT_SCHEMA_VERSION};

use crate::error::EstimatorError;
use crate::types::{OperatingInputs, PredictionResult};

/// Feature names, in the order the model expects them.
pub const FEATURE_NAMES: [&str; 7] = [
    "Installed_Capacity_MW",
    "Coal_Received_MTPA",
    "Gas_Received_MMSCM",
    "PLF_Percentage",
    "Fuel_Cost_per_Unit",
    "Avg_Tariff",
    "RE_Share_Percentage",
];

/// Target names, in the order the model produces them.
pub const TARGET_NAMES: [&str; 2] = ["Power_Generation_BU", "CO2_Emissions_Tonnes"];

/// One row of model input, ordered per `FEATURE_NAMES`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; 7]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; 7] {
        &self.0
    }

    /// Pair each value with its feature name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<&OperatingInputs> for FeatureVector {
    fn from(inputs: &OperatingInputs) -> Self {
        Self([
            inputs.installed_capacity_mw,
            inputs.coal_received_mtpa,
            inputs.gas_received_mmscm,
            inputs.plf_pct,
            inputs.fuel_cost_per_unit,
            inputs.avg_tariff,
            inputs.re_share_pct,
        ])
    }
}

/// Trait for prediction models
///
/// Implementations must be pure with respect to their inputs; the estimator
/// shares one instance across parallel batch requests.
pub trait Predictor: Send + Sync {
    /// Model name, for logs
    fn name(&self) -> &str;

    /// Predict generation and emissions for one feature row
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, EstimatorError>;
}
