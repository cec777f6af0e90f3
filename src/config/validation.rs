//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for PlantConfig.
///
/// Maintained by hand to match the struct hierarchy in plant_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [plant]
        "plant",
        "plant.name",
        "plant.operator",
        // [model]
        "model",
        "model.path",
        // [thresholds]
        "thresholds",
        "thresholds.financial",
        "thresholds.financial.thin_margin_percent",
        "thresholds.financial.cost_share_warning_percent",
        "thresholds.plf",
        "thresholds.plf.critical_percent",
        "thresholds.plf.optimal_percent",
        "thresholds.plf.high_percent",
        "thresholds.plf.implied_deviation_points",
        "thresholds.fuel_cost",
        "thresholds.fuel_cost.high_per_unit",
        "thresholds.fuel_cost.critical_per_unit",
        "thresholds.tariff",
        "thresholds.tariff.low_per_unit",
        "thresholds.tariff.high_per_unit",
        "thresholds.emissions",
        "thresholds.emissions.co2_high_tonnes",
        "thresholds.emissions.intensity_high_t_per_mwh",
        "thresholds.renewables",
        "thresholds.renewables.low_percent",
        "thresholds.renewables.high_percent",
        "thresholds.fuel_supply",
        "thresholds.fuel_supply.coal_low_mtpa",
        "thresholds.fuel_supply.gas_low_mmscm",
        "thresholds.capacity",
        "thresholds.capacity.small_mw",
        "thresholds.capacity.large_mw",
        // [advisory]
        "advisory",
        "advisory.max_messages",
        "advisory.include_generic_tips",
        // [export]
        "export",
        "export.include_advisories",
        "export.output_dir",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails: TOML syntax errors are reported later by serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed PlantConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must stop
/// the config from loading; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::PlantConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let t = &config.thresholds;

    // Percentages of a physical whole
    for (name, value) in [
        ("plf.critical_percent", t.plf.critical_percent),
        ("plf.optimal_percent", t.plf.optimal_percent),
        ("plf.high_percent", t.plf.high_percent),
        ("renewables.low_percent", t.renewables.low_percent),
        ("renewables.high_percent", t.renewables.high_percent),
    ] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!("{name} = {value:.1} is outside 0-100%"));
        }
    }

    if !(-100.0..=100.0).contains(&t.financial.thin_margin_percent) {
        errors.push(format!(
            "financial.thin_margin_percent = {:.1} is outside -100..100%",
            t.financial.thin_margin_percent
        ));
    }

    for (name, value) in [
        ("financial.cost_share_warning_percent", t.financial.cost_share_warning_percent),
        ("fuel_cost.high_per_unit", t.fuel_cost.high_per_unit),
        ("fuel_cost.critical_per_unit", t.fuel_cost.critical_per_unit),
        ("tariff.low_per_unit", t.tariff.low_per_unit),
        ("tariff.high_per_unit", t.tariff.high_per_unit),
        ("emissions.co2_high_tonnes", t.emissions.co2_high_tonnes),
        ("emissions.intensity_high_t_per_mwh", t.emissions.intensity_high_t_per_mwh),
        ("fuel_supply.coal_low_mtpa", t.fuel_supply.coal_low_mtpa),
        ("fuel_supply.gas_low_mmscm", t.fuel_supply.gas_low_mmscm),
        ("capacity.small_mw", t.capacity.small_mw),
        ("capacity.large_mw", t.capacity.large_mw),
    ] {
        if value < 0.0 {
            errors.push(format!("{name} = {value:.2} cannot be negative"));
        }
    }

    // Coal-fired stations sit around 0.9-1.1 tCO₂/MWh; above 2 is almost certainly a unit slip
    let intensity = t.emissions.intensity_high_t_per_mwh;
    if intensity > 2.0 {
        warnings.push(ValidationWarning {
            field: "thresholds.emissions.intensity_high_t_per_mwh".to_string(),
            message: format!(
                "intensity_high_t_per_mwh = {intensity:.2} is outside typical range (0-2 tCO2/MWh)"
            ),
            suggestion: None,
        });
    }

    for (field, value) in [
        ("thresholds.fuel_cost.critical_per_unit", t.fuel_cost.critical_per_unit),
        ("thresholds.tariff.high_per_unit", t.tariff.high_per_unit),
    ] {
        if value > 20.0 {
            warnings.push(ValidationWarning {
                field: field.to_string(),
                message: format!("{field} = {value:.2} is outside typical range (0-20 ₹/kWh)"),
                suggestion: None,
            });
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
