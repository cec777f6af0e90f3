//! System-wide default constants.
//!
//! Centralises unit conversions and limits used across the estimator.

// ============================================================================
// Units
// ============================================================================

/// Scale from billion units × ₹/kWh to ₹ crore.
///
/// `1 BU × 1 ₹/kWh = 10^9 ₹ = 100 crore`
pub const CRORE_SCALE: f64 = 100.0;

/// Megawatt-hours in one billion units (1 BU = 1 TWh).
pub const MWH_PER_BU: f64 = 1_000_000.0;

/// Hours in a (non-leap) year, for load factor arithmetic.
pub const HOURS_PER_YEAR: f64 = 8_760.0;

// ============================================================================
// Advisory Engine
// ============================================================================

/// Hard upper bound on advisory messages per request.
pub const MAX_ADVISORY_MESSAGES: usize = 50;

/// Sentinel emitted when no conditional rule fires.
pub const ALL_OPTIMAL_MESSAGE: &str =
    "All indicators are within optimal ranges. Continue current operating practice.";

/// Separator used when advisory texts share one CSV cell.
pub const ADVISORY_JOIN_SEPARATOR: &str = " | ";

// ============================================================================
// Configuration
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "PLANT_ADVISOR_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "plant_config.toml";

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/plant_model.json";
