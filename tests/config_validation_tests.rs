//! Config Validation Tests
//!
//! Typo detection and range validation for `plant_config.toml`, exercised
//! independently from the estimator.

use plant_advisor::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use plant_advisor::config::{ConfigError, PlantConfig};
use plant_advisor::{AdvisoryCategory, OperatingInputs, PredictionResult, RuleTable};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_plf_threshold_warns_with_suggestion() {
    let toml_str = r#"
[thresholds.plf]
critcal_percent = 45.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("critcal_percent"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("thresholds.plf.critical_percent")
    );
}

#[test]
fn typo_in_section_name_warns() {
    let toml_str = r#"
[advisroy]
max_messages = 20
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.iter().any(|w| w.suggestion.as_deref() == Some("advisory")));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[plant]
name = "Singrauli"
operator = "Shift B"

[model]
path = "models/plant_model.json"

[thresholds.financial]
thin_margin_percent = 8.0

[thresholds.fuel_cost]
high_per_unit = 3.8
critical_per_unit = 4.8

[thresholds.emissions]
co2_high_tonnes = 200000000.0

[advisory]
max_messages = 25
include_generic_tips = false

[export]
include_advisories = false
output_dir = "reports"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    assert!(PlantConfig::from_toml_str(toml_str).is_ok());
}

#[test]
fn unrelated_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert!(suggest_correction("turbine_blade_count", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn default_config_is_clean() {
    let (errors, warnings) = validate_physical_ranges(&PlantConfig::default());
    assert!(errors.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn renewable_threshold_above_hundred_is_error() {
    let toml_str = r#"
[thresholds.renewables]
high_percent = 150.0
"#;
    match PlantConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("renewables.high_percent")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn inverted_tariff_band_is_error() {
    let toml_str = r#"
[thresholds.tariff]
low_per_unit = 7.0
high_per_unit = 6.0
"#;
    assert!(matches!(
        PlantConfig::from_toml_str(toml_str),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn malformed_toml_is_parse_error() {
    assert!(matches!(
        PlantConfig::from_toml_str("[thresholds.plf\noptimal_percent = 1"),
        Err(ConfigError::Parse(..))
    ));
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plant_config.toml");
    PlantConfig::default().save_to_file(&path).unwrap();
    let loaded = PlantConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.thresholds.plf.high_percent, 90.0);
    assert_eq!(loaded.plant.name, "Unnamed Plant");
}

// ============================================================================
// Thresholds flow into the rule table
// ============================================================================

#[test]
fn configured_thresholds_change_rule_outcome() {
    let inputs = OperatingInputs::default(); // PLF 72
    let prediction = PredictionResult { power_bu: 378.0, co2_tonnes: 200_000_000.0 };
    let metrics = plant_advisor::derive_metrics(&prediction, 3.2, 4.0).unwrap();

    let stock = RuleTable::from_config(&PlantConfig::default());
    let out = stock.evaluate(&inputs, &prediction, &metrics).unwrap();
    assert!(out.iter().any(|m| m.category == AdvisoryCategory::LoadFactor));

    let relaxed = PlantConfig::from_toml_str(
        r#"
[thresholds.plf]
critical_percent = 40.0
optimal_percent = 70.0
"#,
    )
    .unwrap();
    let out = RuleTable::from_config(&relaxed)
        .evaluate(&inputs, &prediction, &metrics)
        .unwrap();
    assert!(!out.iter().any(|m| m.category == AdvisoryCategory::LoadFactor));
}
