//! Outbound notification handoff
//!
//! A payload is built from one complete record and handed to a `Notifier`.
//! Transport, credentials and retry belong to the notifier implementation;
//! the crate only ships one that writes the payload to the log.

use serde::Serialize;
use tracing::info;

use crate::error::EstimatorError;
use crate::report;
use crate::types::PredictionRecord;

/// Message handed to an outbound sender.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub subject: String,
    pub body: String,
    pub record: PredictionRecord,
}

impl NotificationPayload {
    pub fn from_record(plant_name: &str, record: &PredictionRecord) -> Self {
        let subject = format!(
            "[{plant_name}] Generation estimate {}",
            record.recorded_at().format("%Y-%m-%d %H:%M UTC")
        );
        Self {
            subject,
            body: report::render_record(record),
            record: record.clone(),
        }
    }
}

/// Trait for outbound notification senders
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, payload: &NotificationPayload) -> Result<(), EstimatorError>;
}

/// Logs the payload instead of sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn name(&self) -> &str {
        "tracing"
    }

    fn send(&self, payload: &NotificationPayload) -> Result<(), EstimatorError> {
        info!(
            subject = %payload.subject,
            power_bu = payload.record.prediction().power_bu,
            profit_cr = payload.record.metrics().profit_cr,
            advisories = payload.record.advisories().len(),
            "Notification handed off"
        );
        Ok(())
    }
}
