//! Session record: inputs + prediction + derived metrics, composed once

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdvisoryMessage, DerivedMetrics, OperatingInputs, PredictionResult};

/// One completed prediction, as stored in the session history.
///
/// Fields are private so a record cannot change after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    recorded_at: DateTime<Utc>,
    inputs: OperatingInputs,
    prediction: PredictionResult,
    metrics: DerivedMetrics,
    advisories: Vec<AdvisoryMessage>,
}

impl PredictionRecord {
    pub fn new(
        inputs: OperatingInputs,
        prediction: PredictionResult,
        metrics: DerivedMetrics,
        advisories: Vec<AdvisoryMessage>,
    ) -> Self {
        Self {
            recorded_at: Utc::now(),
            inputs,
            prediction,
            metrics,
            advisories,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn inputs(&self) -> &OperatingInputs {
        &self.inputs
    }

    pub fn prediction(&self) -> &PredictionResult {
        &self.prediction
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn advisories(&self) -> &[AdvisoryMessage] {
        &self.advisories
    }
}
