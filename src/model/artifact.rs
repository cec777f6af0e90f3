//! Linear multi-output model loaded from a versioned JSON artifact
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "name": "plant-linear-v1",
//!   "features": ["Installed_Capacity_MW", ...],
//!   "targets": ["Power_Generation_BU", "CO2_Emissions_Tonnes"],
//!   "intercepts": [b0, b1],
//!   "coefficients": [[w0..w6], [w0..w6]]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FeatureVector, Predictor, FEATURE_NAMES, TARGET_NAMES};
use crate::error::EstimatorError;
use crate::types::PredictionResult;

/// Artifact layout version this build understands.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// On-disk form of a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    #[serde(default)]
    pub name: String,
    pub features: Vec<String>,
    pub targets: Vec<String>,
    pub intercepts: Vec<f64>,
    pub coefficients: Vec<Vec<f64>>,
}

impl ModelArtifact {
    /// Check the artifact against the feature/target contract.
    pub fn check_contract(&self) -> Result<(), EstimatorError> {
        if self.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(EstimatorError::ModelUnavailable(format!(
                "unsupported schema_version {} (expected {ARTIFACT_SCHEMA_VERSION})",
                self.schema_version
            )));
        }

        if self.features.len() != FEATURE_NAMES.len()
            || self.features.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return Err(EstimatorError::ModelUnavailable(format!(
                "feature schema mismatch: expected {FEATURE_NAMES:?}, got {:?}",
                self.features
            )));
        }

        if self.targets.len() != TARGET_NAMES.len()
            || self.targets.iter().zip(TARGET_NAMES).any(|(a, b)| a != b)
        {
            return Err(EstimatorError::ModelUnavailable(format!(
                "target schema mismatch: expected {TARGET_NAMES:?}, got {:?}",
                self.targets
            )));
        }

        if self.intercepts.len() != TARGET_NAMES.len()
            || self.coefficients.len() != TARGET_NAMES.len()
            || self.coefficients.iter().any(|row| row.len() != FEATURE_NAMES.len())
        {
            return Err(EstimatorError::ModelUnavailable(format!(
                "coefficient shape mismatch: expected {}x{} plus {} intercepts",
                TARGET_NAMES.len(),
                FEATURE_NAMES.len(),
                TARGET_NAMES.len()
            )));
        }

        let all_finite = self
            .intercepts
            .iter()
            .chain(self.coefficients.iter().flatten())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(EstimatorError::ModelUnavailable(
                "artifact contains non-finite weights".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Linear Model
// ============================================================================

/// `y[t] = intercepts[t] + Σ coefficients[t][f] · x[f]`, clamped at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    name: String,
    intercepts: [f64; 2],
    coefficients: [[f64; 7]; 2],
}

impl LinearModel {
    /// Load and contract-check an artifact file.
    ///
    /// A missing file, malformed JSON or a contract violation is
    /// `ModelUnavailable`.
    pub fn load(path: &Path) -> Result<Self, EstimatorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EstimatorError::ModelUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let model = Self::from_json_str(&raw).map_err(|e| match e {
            EstimatorError::ModelUnavailable(msg) => {
                EstimatorError::ModelUnavailable(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        info!(
            model = %model.name,
            path = %path.display(),
            features = FEATURE_NAMES.len(),
            "Prediction model loaded"
        );
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EstimatorError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)
            .map_err(|e| EstimatorError::ModelUnavailable(format!("malformed artifact: {e}")))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, EstimatorError> {
        artifact.check_contract()?;

        let shape_err = || EstimatorError::ModelUnavailable("coefficient shape mismatch".to_string());
        let intercepts = <[f64; 2]>::try_from(artifact.intercepts.as_slice()).map_err(|_| shape_err())?;
        let mut coefficients = [[0.0; 7]; 2];
        for (dst, src) in coefficients.iter_mut().zip(&artifact.coefficients) {
            *dst = <[f64; 7]>::try_from(src.as_slice()).map_err(|_| shape_err())?;
        }

        let name = if artifact.name.is_empty() {
            "linear".to_string()
        } else {
            artifact.name
        };

        Ok(Self { name, intercepts, coefficients })
    }

    /// One target, clamped at zero. The finiteness check runs on the raw
    /// value since `f64::max` would turn NaN into 0.
    fn target(&self, t: usize, x: &[f64; 7]) -> Result<f64, EstimatorError> {
        let dot: f64 = self.coefficients[t].iter().zip(x).map(|(w, v)| w * v).sum();
        let raw = self.intercepts[t] + dot;
        if !raw.is_finite() {
            return Err(EstimatorError::ModelUnavailable(format!(
                "model '{}' produced a non-finite {} ({raw})",
                self.name, TARGET_NAMES[t]
            )));
        }
        Ok(raw.max(0.0))
    }
}

impl Predictor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, EstimatorError> {
        let x = features.values();
        Ok(PredictionResult {
            power_bu: self.target(0, x)?,
            co2_tonnes: self.target(1, x)?,
        })
    }
}
