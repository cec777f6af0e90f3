//! Estimator - validate → predict → derive → advise for one request
//!
//! The estimator owns the prediction model and the rule table. It holds no
//! per-request state, so one instance can serve any number of sessions and
//! parallel batch requests.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::advisory::RuleTable;
use crate::config::PlantConfig;
use crate::error::EstimatorError;
use crate::metrics::derive_metrics;
use crate::model::{FeatureVector, Predictor};
use crate::session::SessionHistory;
use crate::types::{OperatingInputs, PredictionRecord};

pub struct Estimator {
    predictor: Arc<dyn Predictor>,
    rules: RuleTable,
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("predictor", &self.predictor.name())
            .field("rules", &self.rules.rules().len())
            .finish()
    }
}

impl Estimator {
    /// Build an estimator with the stock rule table configured from `config`.
    pub fn new(predictor: Arc<dyn Predictor>, config: &PlantConfig) -> Self {
        Self::with_rules(predictor, RuleTable::from_config(config))
    }

    pub fn with_rules(predictor: Arc<dyn Predictor>, rules: RuleTable) -> Self {
        Self { predictor, rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Run one request through the full pipeline.
    ///
    /// Out-of-domain inputs are logged and surfaced as advisories; only
    /// non-finite inputs (`InvalidInput`) or a failing model
    /// (`ModelUnavailable`) stop the request.
    pub fn estimate(&self, inputs: &OperatingInputs) -> Result<PredictionRecord, EstimatorError> {
        if let Err(e) = inputs.ensure_finite() {
            warn!(error = %e, "Request rejected");
            return Err(e);
        }

        for violation in inputs.domain_violations() {
            warn!(
                field = violation.field,
                value = violation.value,
                expected = %violation.domain,
                "Input outside expected range, continuing"
            );
        }

        let prediction = self
            .predictor
            .predict(&FeatureVector::from(inputs))
            .and_then(|p| {
                p.ensure_finite().map_err(|_| {
                    EstimatorError::ModelUnavailable(format!(
                        "model '{}' returned a non-finite prediction",
                        self.predictor.name()
                    ))
                })?;
                Ok(p)
            })
            .inspect_err(|e| warn!(model = self.predictor.name(), error = %e, "Prediction failed"))?;

        let metrics = derive_metrics(&prediction, inputs.fuel_cost_per_unit, inputs.avg_tariff)?;
        let advisories = self.rules.evaluate(inputs, &prediction, &metrics)?;

        debug!(
            power_bu = prediction.power_bu,
            co2_tonnes = prediction.co2_tonnes,
            profit_cr = metrics.profit_cr,
            advisories = advisories.len(),
            "Estimate complete"
        );

        Ok(PredictionRecord::new(*inputs, prediction, metrics, advisories))
    }

    /// Estimate and, on success only, append the record to `history`.
    pub fn submit(
        &self,
        history: &mut SessionHistory,
        inputs: &OperatingInputs,
    ) -> Result<PredictionRecord, EstimatorError> {
        let record = self.estimate(inputs)?;
        history.append(record.clone());
        Ok(record)
    }

    /// Estimate many independent requests in parallel; results keep input order.
    pub fn estimate_batch(
        &self,
        batch: &[OperatingInputs],
    ) -> Vec<Result<PredictionRecord, EstimatorError>> {
        debug!(requests = batch.len(), "Batch estimate started");
        batch.par_iter().map(|inputs| self.estimate(inputs)).collect()
    }
}
