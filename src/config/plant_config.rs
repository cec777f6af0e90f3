//! Plant Configuration - advisory thresholds as operator-tunable TOML values
//!
//! Every band the advisory engine tests against is a field in this module.
//! Each struct implements `Default` with the stock values, so an empty or
//! missing config file behaves exactly like the built-in rule table.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one plant deployment.
///
/// Load with `PlantConfig::load()` which searches:
/// 1. `$PLANT_ADVISOR_CONFIG` env var
/// 2. `./plant_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Plant identification
    #[serde(default)]
    pub plant: PlantInfo,

    /// Prediction model artifact
    #[serde(default)]
    pub model: ModelConfig,

    /// Advisory rule thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Advisory output policy
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// CSV export options
    #[serde(default)]
    pub export: ExportConfig,
}

impl PlantConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PLANT_ADVISOR_CONFIG` environment variable
    /// 2. `./plant_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), plant = %config.plant.name, "Loaded plant config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(plant = %config.plant.name, "Loaded plant config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No plant_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings (with a suggestion when one is
    /// close); inconsistent thresholds are a hard error.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML (used by `config init`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Plant config saved");
        Ok(())
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Band edges must be ordered (critical < optimal < high, low < high)
    /// - Percent thresholds stay within 0-100
    /// - `advisory.max_messages` is within 1..=50
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let mut errors: Vec<String> = Vec::new();

        Self::check_ordered(t.plf.critical_percent, t.plf.optimal_percent, "plf.critical_percent", "plf.optimal_percent", &mut errors);
        Self::check_ordered(t.plf.optimal_percent, t.plf.high_percent, "plf.optimal_percent", "plf.high_percent", &mut errors);
        Self::check_ordered(t.tariff.low_per_unit, t.tariff.high_per_unit, "tariff.low_per_unit", "tariff.high_per_unit", &mut errors);
        Self::check_ordered(t.renewables.low_percent, t.renewables.high_percent, "renewables.low_percent", "renewables.high_percent", &mut errors);
        Self::check_ordered(t.capacity.small_mw, t.capacity.large_mw, "capacity.small_mw", "capacity.large_mw", &mut errors);

        // Critical fuel cost may equal the high band (single-step escalation)
        if t.fuel_cost.critical_per_unit < t.fuel_cost.high_per_unit {
            errors.push(format!(
                "fuel_cost.critical_per_unit ({:.2}) must be >= high_per_unit ({:.2})",
                t.fuel_cost.critical_per_unit, t.fuel_cost.high_per_unit
            ));
        }

        if t.plf.implied_deviation_points <= 0.0 {
            errors.push("plf.implied_deviation_points must be > 0".to_string());
        }

        let cap = self.advisory.max_messages;
        if cap == 0 || cap > defaults::MAX_ADVISORY_MESSAGES {
            errors.push(format!(
                "advisory.max_messages = {cap} must be within 1..={}",
                defaults::MAX_ADVISORY_MESSAGES
            ));
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // NaN/Inf slip through ordered comparisons
        for (name, value) in t.named_values() {
            if !value.is_finite() {
                errors.push(format!("thresholds.{name} = {value} must be a finite number"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_ordered(lower: f64, upper: f64, lower_name: &str, upper_name: &str, errors: &mut Vec<String>) {
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{lower_name}/{upper_name}: values must be finite (got {lower}, {upper})"
            ));
            return;
        }
        if lower >= upper {
            errors.push(format!(
                "{lower_name} ({lower:.3}) must be less than {upper_name} ({upper:.3})"
            ));
        }
    }
}

// ============================================================================
// Plant / Model
// ============================================================================

/// Plant identification, shown in reports and notification subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantInfo {
    #[serde(default = "default_plant_name")]
    pub name: String,

    #[serde(default)]
    pub operator: String,
}

fn default_plant_name() -> String {
    "Unnamed Plant".to_string()
}

impl Default for PlantInfo {
    fn default() -> Self {
        Self {
            name: default_plant_name(),
            operator: String::new(),
        }
    }
}

/// Location of the regression artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model artifact.
    ///
    /// Can be overridden by the `--model` CLI flag.
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    defaults::DEFAULT_MODEL_PATH.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { path: default_model_path() }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// All advisory rule thresholds, grouped by rule family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub financial: FinancialThresholds,
    #[serde(default)]
    pub plf: PlfThresholds,
    #[serde(default)]
    pub fuel_cost: FuelCostThresholds,
    #[serde(default)]
    pub tariff: TariffThresholds,
    #[serde(default)]
    pub emissions: EmissionThresholds,
    #[serde(default)]
    pub renewables: RenewableThresholds,
    #[serde(default)]
    pub fuel_supply: FuelSupplyThresholds,
    #[serde(default)]
    pub capacity: CapacityThresholds,
}

impl ThresholdConfig {
    /// Every threshold with its dotted name below `thresholds.`.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("financial.thin_margin_percent", self.financial.thin_margin_percent),
            ("financial.cost_share_warning_percent", self.financial.cost_share_warning_percent),
            ("plf.critical_percent", self.plf.critical_percent),
            ("plf.optimal_percent", self.plf.optimal_percent),
            ("plf.high_percent", self.plf.high_percent),
            ("plf.implied_deviation_points", self.plf.implied_deviation_points),
            ("fuel_cost.high_per_unit", self.fuel_cost.high_per_unit),
            ("fuel_cost.critical_per_unit", self.fuel_cost.critical_per_unit),
            ("tariff.low_per_unit", self.tariff.low_per_unit),
            ("tariff.high_per_unit", self.tariff.high_per_unit),
            ("emissions.co2_high_tonnes", self.emissions.co2_high_tonnes),
            ("emissions.intensity_high_t_per_mwh", self.emissions.intensity_high_t_per_mwh),
            ("renewables.low_percent", self.renewables.low_percent),
            ("renewables.high_percent", self.renewables.high_percent),
            ("fuel_supply.coal_low_mtpa", self.fuel_supply.coal_low_mtpa),
            ("fuel_supply.gas_low_mmscm", self.fuel_supply.gas_low_mmscm),
            ("capacity.small_mw", self.capacity.small_mw),
            ("capacity.large_mw", self.capacity.large_mw),
        ]
    }
}

/// Profit / revenue / cost bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialThresholds {
    /// Profit margin below this is "thin" (%)
    #[serde(default = "default_thin_margin")]
    pub thin_margin_percent: f64,

    /// Fuel cost above this share of revenue warrants review (%)
    #[serde(default = "default_cost_share_warning")]
    pub cost_share_warning_percent: f64,
}

fn default_thin_margin() -> f64 { 10.0 }
fn default_cost_share_warning() -> f64 { 90.0 }

impl Default for FinancialThresholds {
    fn default() -> Self {
        Self {
            thin_margin_percent: default_thin_margin(),
            cost_share_warning_percent: default_cost_share_warning(),
        }
    }
}

/// Plant load factor bands (%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlfThresholds {
    #[serde(default = "default_plf_critical")]
    pub critical_percent: f64,

    #[serde(default = "default_plf_optimal")]
    pub optimal_percent: f64,

    /// Sustained operation above this needs planned maintenance windows
    #[serde(default = "default_plf_high")]
    pub high_percent: f64,

    /// Allowed gap between entered PLF and the PLF implied by predicted generation
    #[serde(default = "default_plf_implied_deviation")]
    pub implied_deviation_points: f64,
}

fn default_plf_critical() -> f64 { 50.0 }
fn default_plf_optimal() -> f64 { 75.0 }
fn default_plf_high() -> f64 { 90.0 }
fn default_plf_implied_deviation() -> f64 { 20.0 }

impl Default for PlfThresholds {
    fn default() -> Self {
        Self {
            critical_percent: default_plf_critical(),
            optimal_percent: default_plf_optimal(),
            high_percent: default_plf_high(),
            implied_deviation_points: default_plf_implied_deviation(),
        }
    }
}

/// Fuel cost bands (₹/kWh).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelCostThresholds {
    #[serde(default = "default_fuel_high")]
    pub high_per_unit: f64,

    #[serde(default = "default_fuel_critical")]
    pub critical_per_unit: f64,
}

fn default_fuel_high() -> f64 { 3.5 }
fn default_fuel_critical() -> f64 { 4.5 }

impl Default for FuelCostThresholds {
    fn default() -> Self {
        Self {
            high_per_unit: default_fuel_high(),
            critical_per_unit: default_fuel_critical(),
        }
    }
}

/// Tariff bands (₹/kWh).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffThresholds {
    #[serde(default = "default_tariff_low")]
    pub low_per_unit: f64,

    #[serde(default = "default_tariff_high")]
    pub high_per_unit: f64,
}

fn default_tariff_low() -> f64 { 3.5 }
fn default_tariff_high() -> f64 { 6.0 }

impl Default for TariffThresholds {
    fn default() -> Self {
        Self {
            low_per_unit: default_tariff_low(),
            high_per_unit: default_tariff_high(),
        }
    }
}

/// CO₂ bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionThresholds {
    /// Absolute annual emissions (tonnes)
    #[serde(default = "default_co2_high")]
    pub co2_high_tonnes: f64,

    /// Emission intensity (tCO₂ per MWh generated)
    #[serde(default = "default_intensity_high")]
    pub intensity_high_t_per_mwh: f64,
}

fn default_co2_high() -> f64 { 250_000_000.0 }
fn default_intensity_high() -> f64 { 0.9 }

impl Default for EmissionThresholds {
    fn default() -> Self {
        Self {
            co2_high_tonnes: default_co2_high(),
            intensity_high_t_per_mwh: default_intensity_high(),
        }
    }
}

/// Renewable share bands (%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewableThresholds {
    #[serde(default = "default_re_low")]
    pub low_percent: f64,

    #[serde(default = "default_re_high")]
    pub high_percent: f64,
}

fn default_re_low() -> f64 { 20.0 }
fn default_re_high() -> f64 { 50.0 }

impl Default for RenewableThresholds {
    fn default() -> Self {
        Self {
            low_percent: default_re_low(),
            high_percent: default_re_high(),
        }
    }
}

/// Fuel receipt minimums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelSupplyThresholds {
    #[serde(default = "default_coal_low")]
    pub coal_low_mtpa: f64,

    #[serde(default = "default_gas_low")]
    pub gas_low_mmscm: f64,
}

fn default_coal_low() -> f64 { 10_000_000.0 }
fn default_gas_low() -> f64 { 1_000.0 }

impl Default for FuelSupplyThresholds {
    fn default() -> Self {
        Self {
            coal_low_mtpa: default_coal_low(),
            gas_low_mmscm: default_gas_low(),
        }
    }
}

/// Installed capacity bands (MW).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityThresholds {
    #[serde(default = "default_capacity_small")]
    pub small_mw: f64,

    #[serde(default = "default_capacity_large")]
    pub large_mw: f64,
}

fn default_capacity_small() -> f64 { 1_000.0 }
fn default_capacity_large() -> f64 { 75_000.0 }

impl Default for CapacityThresholds {
    fn default() -> Self {
        Self {
            small_mw: default_capacity_small(),
            large_mw: default_capacity_large(),
        }
    }
}

// ============================================================================
// Advisory / Export
// ============================================================================

/// Advisory output policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Cap on messages per request (at most 50).
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Append the unconditional best-practice tips.
    #[serde(default = "default_include_tips")]
    pub include_generic_tips: bool,
}

fn default_max_messages() -> usize { defaults::MAX_ADVISORY_MESSAGES }
fn default_include_tips() -> bool { true }

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            include_generic_tips: default_include_tips(),
        }
    }
}

/// CSV export options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Add an `advisories` column to exported rows.
    #[serde(default = "default_include_advisories")]
    pub include_advisories: bool,

    /// Directory for timestamped exports when no explicit path is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_include_advisories() -> bool { true }
fn default_output_dir() -> String { "exports".to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_advisories: default_include_advisories(),
            output_dir: default_output_dir(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = PlantConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: PlantConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.thresholds.plf.optimal_percent, 75.0);
        assert_eq!(config.thresholds.fuel_cost.high_per_unit, 3.5);
        assert_eq!(config.advisory.max_messages, 50);
        assert!(config.advisory.include_generic_tips);
        assert_eq!(config.model.path, "models/plant_model.json");
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[plant]
name = "Vindhyachal"

[thresholds.plf]
optimal_percent = 80.0
"#;
        let config = PlantConfig::from_toml_str(toml_str).expect("partial TOML should load");
        assert_eq!(config.plant.name, "Vindhyachal");
        assert_eq!(config.thresholds.plf.optimal_percent, 80.0);
        // Non-overridden values retain defaults
        assert_eq!(config.thresholds.plf.critical_percent, 50.0);
        assert_eq!(config.thresholds.tariff.low_per_unit, 3.5);
    }

    #[test]
    fn test_validation_catches_inverted_plf_bands() {
        let mut config = PlantConfig::default();
        config.thresholds.plf.critical_percent = 80.0;
        config.thresholds.plf.optimal_percent = 70.0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("plf.critical_percent")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_catches_fuel_cost_escalation() {
        let mut config = PlantConfig::default();
        config.thresholds.fuel_cost.critical_per_unit = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_allows_equal_fuel_cost_bands() {
        let mut config = PlantConfig::default();
        config.thresholds.fuel_cost.critical_per_unit = config.thresholds.fuel_cost.high_per_unit;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_caps_max_messages() {
        let mut config = PlantConfig::default();
        config.advisory.max_messages = 51;
        assert!(config.validate().is_err());
        config.advisory.max_messages = 0;
        assert!(config.validate().is_err());
        config.advisory.max_messages = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_nan() {
        let mut config = PlantConfig::default();
        config.thresholds.emissions.intensity_high_t_per_mwh = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = PlantConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        assert!(toml_str.contains("[thresholds.plf]"));
        assert!(toml_str.contains("[advisory]"));
        let back = PlantConfig::from_toml_str(&toml_str).expect("round trip should load");
        assert_eq!(back.thresholds.emissions.co2_high_tonnes, original.thresholds.emissions.co2_high_tonnes);
        assert_eq!(back.export.output_dir, original.export.output_dir);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let err = PlantConfig::load_from_file(Path::new("/nonexistent/plant_config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
