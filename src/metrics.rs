//! Metrics Deriver: predicted generation → revenue, fuel cost, profit
//!
//! `revenue_cr = power_bu × avg_tariff × 100`
//! `cost_cr    = power_bu × fuel_cost_per_unit × 100`
//! `profit_cr  = revenue_cr − cost_cr`
//!
//! The factor 100 converts billion units priced in ₹/kWh into ₹ crore.

use crate::config::defaults::CRORE_SCALE;
use crate::error::EstimatorError;
use crate::types::{DerivedMetrics, PredictionResult};

/// Derive the financial metrics for one prediction.
///
/// Pure and idempotent. Fails with `InvalidInput` if `power_bu`,
/// `fuel_cost_per_unit` or `avg_tariff` is NaN or infinite; negative values
/// are passed through (the advisory engine flags them).
pub fn derive_metrics(
    prediction: &PredictionResult,
    fuel_cost_per_unit: f64,
    avg_tariff: f64,
) -> Result<DerivedMetrics, EstimatorError> {
    let power = EstimatorError::require_finite("power_bu", prediction.power_bu)?;
    let fuel_cost = EstimatorError::require_finite("fuel_cost_per_unit", fuel_cost_per_unit)?;
    let tariff = EstimatorError::require_finite("avg_tariff", avg_tariff)?;

    let revenue_cr = power * tariff * CRORE_SCALE;
    let cost_cr = power * fuel_cost * CRORE_SCALE;

    Ok(DerivedMetrics {
        revenue_cr,
        cost_cr,
        profit_cr: revenue_cr - cost_cr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(power_bu: f64) -> PredictionResult {
        PredictionResult { power_bu, co2_tonnes: 0.0 }
    }

    #[test]
    fn test_reference_values() {
        let m = derive_metrics(&prediction(300.0), 3.2, 4.0).unwrap();
        assert_eq!(m.revenue_cr, 120_000.0);
        assert_eq!(m.cost_cr, 96_000.0);
        assert_eq!(m.profit_cr, 24_000.0);
    }

    #[test]
    fn test_profit_is_exact_difference_for_non_negative_inputs() {
        for &power in &[0.0, 0.5, 17.3, 300.0, 1234.567] {
            for &fuel in &[0.0, 1.1, 3.2, 7.9] {
                for &tariff in &[0.0, 2.45, 4.0, 9.99] {
                    let m = derive_metrics(&prediction(power), fuel, tariff).unwrap();
                    assert_eq!(m.profit_cr, m.revenue_cr - m.cost_cr);
                    assert!(m.revenue_cr >= 0.0 && m.cost_cr >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_profit_can_be_negative() {
        let m = derive_metrics(&prediction(100.0), 5.0, 4.0).unwrap();
        assert!(m.profit_cr < 0.0);
        assert_eq!(m.profit_cr, -10_000.0);
    }

    #[test]
    fn test_idempotent() {
        let p = prediction(287.42);
        let a = derive_metrics(&p, 3.17, 4.21).unwrap();
        let b = derive_metrics(&p, 3.17, 4.21).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        assert!(matches!(
            derive_metrics(&prediction(f64::NAN), 3.2, 4.0),
            Err(EstimatorError::InvalidInput { field: "power_bu", .. })
        ));
        assert!(matches!(
            derive_metrics(&prediction(300.0), f64::INFINITY, 4.0),
            Err(EstimatorError::InvalidInput { field: "fuel_cost_per_unit", .. })
        ));
        assert!(matches!(
            derive_metrics(&prediction(300.0), 3.2, f64::NEG_INFINITY),
            Err(EstimatorError::InvalidInput { field: "avg_tariff", .. })
        ));
    }
}
