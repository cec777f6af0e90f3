//! Plant Configuration Module
//!
//! Per-plant configuration loaded from TOML, holding every advisory threshold
//! as an operator-tunable value.
//!
//! ## Loading Order
//!
//! 1. `PLANT_ADVISOR_CONFIG` environment variable (path to TOML file)
//! 2. `plant_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The binary calls `config::init()` once at startup; library code takes a
//! `&PlantConfig` explicitly so it stays testable with ad-hoc configs.
//!
//! ```ignore
//! config::init(PlantConfig::load());
//! let estimator = Estimator::new(predictor, config::get());
//! ```

mod plant_config;
pub mod defaults;
pub mod validation;

pub use plant_config::*;

use std::sync::OnceLock;

/// Global plant configuration, initialized once at startup.
static PLANT_CONFIG: OnceLock<PlantConfig> = OnceLock::new();

/// Built-in defaults, handed out when `init()` was never called.
static DEFAULT_CONFIG: OnceLock<PlantConfig> = OnceLock::new();

/// Initialize the global plant configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: PlantConfig) {
    if PLANT_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global plant configuration, or the built-in defaults before `init()`.
pub fn get() -> &'static PlantConfig {
    PLANT_CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT_CONFIG.get_or_init(PlantConfig::default))
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    PLANT_CONFIG.get().is_some()
}
