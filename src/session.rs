//! Per-session prediction history
//!
//! Append-only and owned by exactly one session. Records are immutable once
//! appended; readers get either a borrowed slice or an owned snapshot, so
//! export never observes a half-written history.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::PredictionRecord;

/// Ordered history of successful predictions for one session.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    session_id: String,
    started_at: DateTime<Utc>,
    records: Vec<PredictionRecord>,
}

impl SessionHistory {
    /// Start an empty history. The session id is the start time plus a
    /// random suffix, so two sessions started together never collide.
    pub fn new() -> Self {
        let started_at = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            session_id: format!("session-{}-{}", started_at.format("%Y%m%dT%H%M%S"), &suffix[..8]),
            started_at,
            records: Vec::new(),
        }
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Append a completed record; returns the new history length.
    pub fn append(&mut self, record: PredictionRecord) -> usize {
        self.records.push(record);
        debug!(session = %self.session_id, len = self.records.len(), "Record appended");
        self.records.len()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in submission order.
    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&PredictionRecord> {
        self.records.last()
    }

    /// Owned copy of the history, for export.
    pub fn snapshot(&self) -> Vec<PredictionRecord> {
        self.records.clone()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DerivedMetrics, OperatingInputs, PredictionResult};

    fn record(plf_pct: f64) -> PredictionRecord {
        PredictionRecord::new(
            OperatingInputs { plf_pct, ..OperatingInputs::default() },
            PredictionResult { power_bu: 300.0, co2_tonnes: 1.0 },
            DerivedMetrics::default(),
            Vec::new(),
        )
    }

    #[test]
    fn test_append_preserves_submission_order() {
        let mut history = SessionHistory::with_id("s1");
        assert!(history.is_empty());
        for (i, plf) in [60.0, 70.0, 80.0].into_iter().enumerate() {
            assert_eq!(history.append(record(plf)), i + 1);
        }
        let plfs: Vec<f64> = history.records().iter().map(|r| r.inputs().plf_pct).collect();
        assert_eq!(plfs, vec![60.0, 70.0, 80.0]);
        assert_eq!(history.latest().map(|r| r.inputs().plf_pct), Some(80.0));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_appends() {
        let mut history = SessionHistory::with_id("s1");
        history.append(record(60.0));
        let snapshot = history.snapshot();
        history.append(record(70.0));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        let a = SessionHistory::new();
        let b = SessionHistory::new();
        assert_ne!(a.session_id(), b.session_id());
        assert!(a.session_id().starts_with("session-"));
    }

    #[test]
    fn test_started_at_precedes_records() {
        let mut history = SessionHistory::new();
        history.append(record(60.0));
        assert!(history.started_at() <= history.records()[0].recorded_at());
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let mut a = SessionHistory::with_id("a");
        let b = SessionHistory::with_id("b");
        a.append(record(60.0));
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
