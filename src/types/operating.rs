//! Request types: OperatingInputs, PredictionResult, DerivedMetrics

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

// ============================================================================
// Operating Inputs
// ============================================================================

/// Operating parameters for one prediction request.
///
/// Immutable once built; consumed by a single estimate. Deserializes from
/// snake_case field names and from the model's training column names, so a
/// scenario CSV cut from the training data loads without renaming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingInputs {
    /// Installed capacity (MW), expected > 0
    #[serde(alias = "Installed_Capacity_MW")]
    pub installed_capacity_mw: f64,
    /// Coal received (MTPA), expected >= 0
    #[serde(alias = "Coal_Received_MTPA")]
    pub coal_received_mtpa: f64,
    /// Gas received (MMSCM), expected >= 0
    #[serde(alias = "Gas_Received_MMSCM")]
    pub gas_received_mmscm: f64,
    /// Plant load factor (%), expected in [0, 100]
    #[serde(alias = "PLF_Percentage")]
    pub plf_pct: f64,
    /// Fuel cost per unit generated (₹/kWh), expected >= 0
    #[serde(alias = "Fuel_Cost_per_Unit")]
    pub fuel_cost_per_unit: f64,
    /// Average tariff / ECR (₹/kWh), expected >= 0
    #[serde(alias = "Avg_Tariff", alias = "Avg_Tariff (ECR)")]
    pub avg_tariff: f64,
    /// Renewable share of generation (%), expected in [0, 100]
    #[serde(alias = "RE_Share_Percentage")]
    pub re_share_pct: f64,
}

impl Default for OperatingInputs {
    fn default() -> Self {
        Self {
            installed_capacity_mw: 60_000.0,
            coal_received_mtpa: 18_500_000.0,
            gas_received_mmscm: 3_000.0,
            plf_pct: 72.0,
            fuel_cost_per_unit: 3.2,
            avg_tariff: 4.0,
            re_share_pct: 28.0,
        }
    }
}

/// Expected range of one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Domain {
    /// Strictly greater than zero
    Positive,
    NonNegative,
    /// Inclusive 0-100
    Percent,
}

impl Domain {
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Positive => value > 0.0,
            Self::NonNegative => value >= 0.0,
            Self::Percent => (0.0..=100.0).contains(&value),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "> 0"),
            Self::NonNegative => write!(f, ">= 0"),
            Self::Percent => write!(f, "0-100"),
        }
    }
}

/// An input outside its expected range.
///
/// Not an error: the estimate still runs and the advisory engine emits a
/// "verify inputs" message for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainViolation {
    pub field: &'static str,
    pub value: f64,
    pub domain: Domain,
}

impl std::fmt::Display for DomainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {} (expected {})", self.field, self.value, self.domain)
    }
}

impl OperatingInputs {
    /// Expected range of every field, in model feature order. The single
    /// source for both `domain_violations` and the verify-inputs advisories.
    pub const DOMAINS: [(&'static str, Domain); 7] = [
        ("installed_capacity_mw", Domain::Positive),
        ("coal_received_mtpa", Domain::NonNegative),
        ("gas_received_mmscm", Domain::NonNegative),
        ("plf_pct", Domain::Percent),
        ("fuel_cost_per_unit", Domain::NonNegative),
        ("avg_tariff", Domain::NonNegative),
        ("re_share_pct", Domain::Percent),
    ];

    /// Field names paired with their values, in model feature order.
    pub fn named_values(&self) -> [(&'static str, f64); 7] {
        [
            ("installed_capacity_mw", self.installed_capacity_mw),
            ("coal_received_mtpa", self.coal_received_mtpa),
            ("gas_received_mmscm", self.gas_received_mmscm),
            ("plf_pct", self.plf_pct),
            ("fuel_cost_per_unit", self.fuel_cost_per_unit),
            ("avg_tariff", self.avg_tariff),
            ("re_share_pct", self.re_share_pct),
        ]
    }

    /// Fail with `InvalidInput` on the first NaN/infinite field.
    pub fn ensure_finite(&self) -> Result<(), EstimatorError> {
        for (field, value) in self.named_values() {
            EstimatorError::require_finite(field, value)?;
        }
        Ok(())
    }

    /// Inputs outside their expected ranges, in field order.
    pub fn domain_violations(&self) -> Vec<DomainViolation> {
        Self::DOMAINS
            .iter()
            .zip(self.named_values())
            .filter(|((_, domain), (_, value))| !domain.contains(*value))
            .map(|(&(field, domain), (_, value))| DomainViolation { field, value, domain })
            .collect()
    }

    /// The violation for one field, if its value is out of range.
    pub fn violation_of(&self, field: &str) -> Option<DomainViolation> {
        self.domain_violations().into_iter().find(|v| v.field == field)
    }
}

// ============================================================================
// Prediction Result
// ============================================================================

/// Output of the prediction collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Power generated (billion units)
    pub power_bu: f64,
    /// CO₂ emitted (tonnes)
    pub co2_tonnes: f64,
}

impl PredictionResult {
    pub fn ensure_finite(&self) -> Result<(), EstimatorError> {
        EstimatorError::require_finite("power_bu", self.power_bu)?;
        EstimatorError::require_finite("co2_tonnes", self.co2_tonnes)?;
        Ok(())
    }

    /// Emission intensity in tonnes CO₂ per MWh, `None` without generation.
    pub fn intensity_t_per_mwh(&self) -> Option<f64> {
        if self.power_bu > 0.0 {
            Some(self.co2_tonnes / (self.power_bu * crate::config::defaults::MWH_PER_BU))
        } else {
            None
        }
    }

    /// Load factor implied by the predicted generation for a given capacity (%).
    pub fn implied_plf_pct(&self, installed_capacity_mw: f64) -> Option<f64> {
        if installed_capacity_mw > 0.0 {
            let max_mwh = installed_capacity_mw * crate::config::defaults::HOURS_PER_YEAR;
            Some(self.power_bu * crate::config::defaults::MWH_PER_BU / max_mwh * 100.0)
        } else {
            None
        }
    }
}

// ============================================================================
// Derived Metrics
// ============================================================================

/// Financial metrics in ₹ crore.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub revenue_cr: f64,
    pub cost_cr: f64,
    /// May be negative
    pub profit_cr: f64,
}

impl DerivedMetrics {
    pub fn ensure_finite(&self) -> Result<(), EstimatorError> {
        EstimatorError::require_finite("revenue_cr", self.revenue_cr)?;
        EstimatorError::require_finite("cost_cr", self.cost_cr)?;
        EstimatorError::require_finite("profit_cr", self.profit_cr)?;
        Ok(())
    }

    /// Profit as a share of revenue (%), `None` when revenue is zero.
    pub fn margin_pct(&self) -> Option<f64> {
        if self.revenue_cr > 0.0 {
            Some(self.profit_cr / self.revenue_cr * 100.0)
        } else {
            None
        }
    }

    /// Fuel cost as a share of revenue (%), `None` when revenue is zero.
    pub fn cost_share_pct(&self) -> Option<f64> {
        if self.revenue_cr > 0.0 {
            Some(self.cost_cr / self.revenue_cr * 100.0)
        } else {
            None
        }
    }
}
