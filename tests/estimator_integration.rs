//! Estimator Integration Tests
//!
//! End-to-end runs against the shipped model artifact: load → estimate →
//! session history → CSV export, plus the failure paths that must leave
//! history untouched.

use std::path::PathBuf;
use std::sync::Arc;

use plant_advisor::config::{self, defaults::ALL_OPTIMAL_MESSAGE};
use plant_advisor::export;
use plant_advisor::{
    AdvisoryCategory, Estimator, EstimatorError, LinearModel, NotificationPayload, Notifier,
    OperatingInputs, PlantConfig, SessionHistory, TracingNotifier,
};

fn ensure_config() {
    if !config::is_initialized() {
        config::init(PlantConfig::default());
    }
}

fn model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/plant_model.json")
}

fn estimator() -> Estimator {
    ensure_config();
    let model = LinearModel::load(&model_path()).unwrap();
    Estimator::new(Arc::new(model), config::get())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * b.abs().max(1.0)
}

// ============================================================================
// Single estimate
// ============================================================================

#[test]
fn shipped_model_estimates_form_defaults() {
    let record = estimator().estimate(&OperatingInputs::default()).unwrap();

    assert!(approx(record.prediction().power_bu, 303.2));
    assert!(approx(record.prediction().co2_tonnes, 238_500_000.0));
    assert!(approx(record.metrics().revenue_cr, 121_280.0));
    assert!(approx(record.metrics().cost_cr, 97_024.0));
    assert_eq!(
        record.metrics().profit_cr,
        record.metrics().revenue_cr - record.metrics().cost_cr
    );

    // PLF 72% sits below the 75% optimal band
    let first = &record.advisories()[0];
    assert_eq!(first.category, AdvisoryCategory::LoadFactor);
    assert!(record.advisories().len() <= 50);
}

#[test]
fn estimates_are_deterministic() {
    let est = estimator();
    let inputs = OperatingInputs { plf_pct: 48.0, fuel_cost_per_unit: 4.7, ..OperatingInputs::default() };
    let a = est.estimate(&inputs).unwrap();
    let b = est.estimate(&inputs).unwrap();
    assert_eq!(a.prediction(), b.prediction());
    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.advisories(), b.advisories());
}

#[test]
fn plf_above_hundred_is_flagged_not_rejected() {
    let inputs = OperatingInputs { plf_pct: 100.01, ..OperatingInputs::default() };
    let record = estimator().estimate(&inputs).unwrap();
    assert_eq!(record.advisories()[0].category, AdvisoryCategory::VerifyInputs);
    assert!(record.advisories()[0].text.contains("exceeds 100%"));

    let inputs = OperatingInputs { plf_pct: 100.0, ..OperatingInputs::default() };
    let record = estimator().estimate(&inputs).unwrap();
    assert!(!record.advisories().iter().any(|m| m.text.contains("exceeds 100%")));
}

#[test]
fn in_band_inputs_yield_exactly_the_sentinel() {
    // 305 BU, 0.78 tCO2/MWh, 20% margin: inside every stock band
    let inputs = OperatingInputs { plf_pct: 75.0, ..OperatingInputs::default() };
    let record = estimator().estimate(&inputs).unwrap();
    assert!(approx(record.prediction().power_bu, 305.0));
    let texts: Vec<&str> = record.advisories().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec![ALL_OPTIMAL_MESSAGE]);
    assert_eq!(record.advisories()[0].category, AdvisoryCategory::AllOptimal);
}

#[test]
fn overflowing_inputs_are_model_unavailable_and_not_recorded() {
    let est = estimator();
    let mut history = SessionHistory::with_id("overflow");
    est.submit(&mut history, &OperatingInputs::default()).unwrap();

    // Finite inputs whose weighted sum is inf - inf on the CO2 target
    let inputs = OperatingInputs {
        coal_received_mtpa: 1e308,
        re_share_pct: 1e308,
        ..OperatingInputs::default()
    };
    let err = est.submit(&mut history, &inputs).unwrap_err();
    assert!(matches!(err, EstimatorError::ModelUnavailable(_)), "got {err:?}");
    assert_eq!(history.len(), 1);
}

// ============================================================================
// Session history
// ============================================================================

#[test]
fn session_records_successes_in_order() {
    let est = estimator();
    let mut history = SessionHistory::with_id("integration");

    let plfs = [55.0, 65.0, 75.0, 85.0];
    for plf in plfs {
        let inputs = OperatingInputs { plf_pct: plf, ..OperatingInputs::default() };
        est.submit(&mut history, &inputs).unwrap();
    }

    let bad = OperatingInputs { avg_tariff: f64::INFINITY, ..OperatingInputs::default() };
    assert!(matches!(
        est.submit(&mut history, &bad),
        Err(EstimatorError::InvalidInput { field: "avg_tariff", .. })
    ));

    assert_eq!(history.len(), plfs.len());
    let recorded: Vec<f64> = history.records().iter().map(|r| r.inputs().plf_pct).collect();
    assert_eq!(recorded, plfs.to_vec());
}

#[test]
fn missing_model_is_model_unavailable() {
    let err = LinearModel::load(&PathBuf::from("models/does_not_exist.json")).unwrap_err();
    assert!(matches!(err, EstimatorError::ModelUnavailable(_)));
}

// ============================================================================
// Batch / export / notify
// ============================================================================

#[test]
fn batch_matches_sequential_estimates() {
    let est = estimator();
    let batch: Vec<OperatingInputs> = (0..32)
        .map(|i| OperatingInputs { plf_pct: 40.0 + f64::from(i), ..OperatingInputs::default() })
        .collect();

    let parallel = est.estimate_batch(&batch);
    for (inputs, result) in batch.iter().zip(&parallel) {
        let sequential = est.estimate(inputs).unwrap();
        let record = result.as_ref().unwrap();
        assert_eq!(record.inputs(), inputs);
        assert_eq!(record.metrics(), sequential.metrics());
        assert_eq!(record.advisories(), sequential.advisories());
    }
}

#[test]
fn exported_history_has_header_and_one_row_per_record() {
    let est = estimator();
    let mut history = SessionHistory::with_id("export");
    for _ in 0..3 {
        est.submit(&mut history, &OperatingInputs::default()).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/history.csv");
    let rows = export::export_to_file(&path, &history.snapshot(), true).unwrap();
    assert_eq!(rows, 3);

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(1), Some("installed_capacity_mw"));
    assert_eq!(headers.iter().last(), Some("advisories"));
    assert_eq!(rdr.records().count(), 3);
}

#[test]
fn notification_payload_from_estimate() {
    let record = estimator().estimate(&OperatingInputs::default()).unwrap();
    let payload = NotificationPayload::from_record("Test Plant", &record);
    assert!(payload.subject.contains("Test Plant"));
    assert!(payload.body.contains("Power Generated: 303.20 BU"));
    assert!(TracingNotifier.send(&payload).is_ok());
}
