//! Stock rule table
//!
//! Table order is the reading order operators expect: input sanity first,
//! then money, load factor, fuel, tariff, emissions, renewables, fuel supply,
//! capacity, and finally the cross-field combinations. Thresholds are copied
//! out of the config when the table is built.

use super::Rule;
use crate::config::ThresholdConfig;
use crate::types::{AdvisoryCategory, AdvisoryMessage, Domain, DomainViolation, OperatingInputs};

use crate::types::AdvisoryCategory::{
    Capacity, Compound, Emissions, Financial, FuelCost, FuelSupply, LoadFactor, Renewables,
    Tariff, VerifyInputs,
};

/// Build the stock rule table for the given thresholds.
pub fn default_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let mut rules = verify_input_rules();
    rules.extend(financial_rules(t));
    rules.extend(load_factor_rules(t));
    rules.extend(fuel_cost_rules(t));
    rules.extend(tariff_rules(t));
    rules.extend(emission_rules(t));
    rules.extend(renewable_rules(t));
    rules.extend(fuel_supply_rules(t));
    rules.extend(capacity_rules(t));
    rules.extend(compound_rules(t));
    rules
}

/// Unconditional best-practice reminders.
pub fn generic_tips() -> Vec<AdvisoryMessage> {
    [
        "Review coal stock days against the monthly receipt plan to avoid fuel-constrained outages.",
        "Track station heat rate monthly; a 1% improvement lowers both fuel cost and CO₂.",
        "Keep PPA and fuel contract renewal dates on the operations calendar.",
    ]
    .into_iter()
    .map(|text| AdvisoryMessage::new(AdvisoryCategory::GeneralTip, text))
    .collect()
}

// ============================================================================
// Verify Inputs (out-of-domain values)
// ============================================================================

/// One rule per input field, generated from `OperatingInputs::DOMAINS` so
/// the advisories and `domain_violations` cannot disagree.
fn verify_input_rules() -> Vec<Rule> {
    OperatingInputs::DOMAINS
        .iter()
        .map(|&(field, _)| {
            Rule::new(
                field,
                VerifyInputs,
                move |c| c.inputs.violation_of(field).is_some(),
                move |c| c.inputs.violation_of(field).map(|v| verify_text(&v)).unwrap_or_default(),
            )
        })
        .collect()
}

fn verify_text(v: &DomainViolation) -> String {
    let subject = match v.field {
        "installed_capacity_mw" => format!("Installed capacity of {:.0} MW", v.value),
        "coal_received_mtpa" => format!("Coal receipt figure of {:.0}", v.value),
        "gas_received_mmscm" => format!("Gas receipt figure of {:.0} MMSCM", v.value),
        "plf_pct" => format!("PLF of {:.2}%", v.value),
        "fuel_cost_per_unit" => format!("Fuel cost of ₹{:.2}/kWh", v.value),
        "avg_tariff" => format!("Tariff of ₹{:.2}/kWh", v.value),
        "re_share_pct" => format!("RE share of {:.2}%", v.value),
        other => format!("{other} of {}", v.value),
    };
    let problem = match v.domain {
        Domain::Positive => "is not positive",
        Domain::NonNegative => "is negative",
        Domain::Percent if v.value > 100.0 => "exceeds 100%",
        Domain::Percent => "is negative",
    };
    format!("{subject} {problem}. Verify inputs.")
}

// ============================================================================
// Financial
// ============================================================================

fn financial_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let thin_margin = t.financial.thin_margin_percent;
    let cost_share_warning = t.financial.cost_share_warning_percent;

    vec![
        Rule::new(
            "operating_loss",
            Financial,
            |c| c.metrics.profit_cr < 0.0,
            |c| format!(
                "Operating at a loss of ₹{:.2} Cr: fuel cost (₹{:.2}/kWh) exceeds tariff realisation (₹{:.2}/kWh). Review fuel sourcing and PPA terms.",
                -c.metrics.profit_cr, c.inputs.fuel_cost_per_unit, c.inputs.avg_tariff
            ),
        ),
        Rule::new(
            "thin_margin",
            Financial,
            move |c| c.metrics.margin_pct().is_some_and(|m| (0.0..thin_margin).contains(&m)),
            move |c| format!(
                "Profit margin is thin at {:.1}% of revenue (below {:.0}%). Look for heat-rate and fuel-logistics savings.",
                c.metrics.margin_pct().unwrap_or_default(), thin_margin
            ),
        ),
        Rule::new(
            "high_cost_share",
            Financial,
            move |c| c.metrics.cost_share_pct().is_some_and(|s| s > cost_share_warning),
            |c| format!(
                "Fuel cost absorbs {:.1}% of revenue. Renegotiate fuel supply agreements or improve station heat rate.",
                c.metrics.cost_share_pct().unwrap_or_default()
            ),
        ),
        Rule::new(
            "no_revenue",
            Financial,
            |c| c.prediction.power_bu > 0.0 && c.metrics.revenue_cr <= 0.0,
            |c| format!(
                "Generation of {:.2} BU earns no revenue at the entered tariff. Confirm the tariff input.",
                c.prediction.power_bu
            ),
        ),
        Rule::new(
            "no_generation",
            Financial,
            |c| c.prediction.power_bu <= 0.0,
            |_| "Model predicts no generation for these inputs. Check capacity, PLF and fuel receipts.".to_string(),
        ),
    ]
}

// ============================================================================
// Plant Load Factor
// ============================================================================

fn load_factor_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let critical = t.plf.critical_percent;
    let optimal = t.plf.optimal_percent;
    let high = t.plf.high_percent;
    let deviation = t.plf.implied_deviation_points;

    vec![
        Rule::new(
            "plf_critical",
            LoadFactor,
            move |c| c.inputs.plf_pct < critical,
            move |c| format!(
                "PLF of {:.1}% is critically low (below {:.0}%). Investigate forced outages, fuel shortages and grid backing-down instructions.",
                c.inputs.plf_pct, critical
            ),
        ),
        Rule::new(
            "plf_below_optimal",
            LoadFactor,
            move |c| c.inputs.plf_pct < optimal,
            move |c| format!(
                "PLF of {:.1}% is below the optimal band ({:.0}%+). Improve unit availability and reduce partial-load operation.",
                c.inputs.plf_pct, optimal
            ),
        ),
        Rule::new(
            "plf_high",
            LoadFactor,
            move |c| c.inputs.plf_pct > high,
            move |c| format!(
                "PLF of {:.1}% is above {:.0}%. Plan maintenance windows to avoid forced outages from sustained high loading.",
                c.inputs.plf_pct, high
            ),
        ),
        Rule::new(
            "plf_implied_mismatch",
            LoadFactor,
            move |c| c.implied_plf().is_some_and(|p| (p - c.inputs.plf_pct).abs() > deviation),
            |c| format!(
                "Predicted generation implies a PLF of {:.1}% against the entered {:.1}%. Cross-check capacity and PLF inputs.",
                c.implied_plf().unwrap_or_default(), c.inputs.plf_pct
            ),
        ),
    ]
}

// ============================================================================
// Fuel Cost / Tariff
// ============================================================================

fn fuel_cost_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let high = t.fuel_cost.high_per_unit;
    let critical = t.fuel_cost.critical_per_unit;

    vec![
        Rule::new(
            "fuel_cost_high",
            FuelCost,
            move |c| c.inputs.fuel_cost_per_unit > high,
            move |c| format!(
                "Fuel cost of ₹{:.2}/kWh is above ₹{:.2}/kWh. Optimise coal blending and review transport logistics.",
                c.inputs.fuel_cost_per_unit, high
            ),
        ),
        Rule::new(
            "fuel_cost_critical",
            FuelCost,
            move |c| c.inputs.fuel_cost_per_unit > critical,
            |c| format!(
                "Fuel cost of ₹{:.2}/kWh is critically high. Prioritise cheaper linkage coal and audit station heat rate.",
                c.inputs.fuel_cost_per_unit
            ),
        ),
    ]
}

fn tariff_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let low = t.tariff.low_per_unit;
    let high = t.tariff.high_per_unit;

    vec![
        Rule::new(
            "tariff_low",
            Tariff,
            move |c| c.inputs.avg_tariff < low,
            move |c| format!(
                "Average tariff of ₹{:.2}/kWh is below ₹{:.2}/kWh. Revisit PPA terms and explore higher-value buyers.",
                c.inputs.avg_tariff, low
            ),
        ),
        Rule::new(
            "tariff_high",
            Tariff,
            move |c| c.inputs.avg_tariff > high,
            move |c| format!(
                "Average tariff of ₹{:.2}/kWh is above ₹{:.2}/kWh. Merit-order dispatch risk: cheaper generators may displace this station.",
                c.inputs.avg_tariff, high
            ),
        ),
    ]
}

// ============================================================================
// Emissions / Renewables
// ============================================================================

fn emission_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let co2_high = t.emissions.co2_high_tonnes;
    let intensity_high = t.emissions.intensity_high_t_per_mwh;

    vec![
        Rule::new(
            "co2_high",
            Emissions,
            move |c| c.prediction.co2_tonnes > co2_high,
            move |c| format!(
                "CO₂ emissions of {:.0} tonnes exceed {:.0} tonnes. Consider biomass co-firing and efficiency upgrades.",
                c.prediction.co2_tonnes, co2_high
            ),
        ),
        Rule::new(
            "intensity_high",
            Emissions,
            move |c| c.intensity().is_some_and(|i| i > intensity_high),
            move |c| format!(
                "Emission intensity of {:.2} tCO₂/MWh exceeds {:.2}. Prioritise heat-rate improvement on the least efficient units.",
                c.intensity().unwrap_or_default(), intensity_high
            ),
        ),
    ]
}

fn renewable_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let low = t.renewables.low_percent;
    let high = t.renewables.high_percent;

    vec![
        Rule::new(
            "re_low",
            Renewables,
            move |c| c.inputs.re_share_pct < low,
            move |c| format!(
                "Renewable share of {:.1}% is below {:.0}%. Accelerate solar and wind capacity additions.",
                c.inputs.re_share_pct, low
            ),
        ),
        Rule::new(
            "re_high",
            Renewables,
            move |c| c.inputs.re_share_pct >= high,
            move |c| format!(
                "Renewable share of {:.1}% is at or above {:.0}%. Plan storage and flexible thermal operation for grid balancing.",
                c.inputs.re_share_pct, high
            ),
        ),
    ]
}

// ============================================================================
// Fuel Supply / Capacity
// ============================================================================

fn fuel_supply_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let coal_low = t.fuel_supply.coal_low_mtpa;
    let gas_low = t.fuel_supply.gas_low_mmscm;

    vec![
        Rule::new(
            "coal_low",
            FuelSupply,
            move |c| c.inputs.coal_received_mtpa < coal_low,
            move |c| format!(
                "Coal receipts of {:.0} are below the {:.0} planning level. Secure additional rakes or imported coal to protect PLF.",
                c.inputs.coal_received_mtpa, coal_low
            ),
        ),
        Rule::new(
            "gas_low",
            FuelSupply,
            move |c| c.inputs.gas_received_mmscm < gas_low,
            move |c| format!(
                "Gas receipts of {:.0} MMSCM are below {:.0} MMSCM. Gas-based units may need to run at reduced load.",
                c.inputs.gas_received_mmscm, gas_low
            ),
        ),
        Rule::new(
            "no_fuel",
            FuelSupply,
            |c| c.inputs.coal_received_mtpa <= 0.0 && c.inputs.gas_received_mmscm <= 0.0,
            |_| "No coal or gas receipts recorded. Generation estimates assume fuel that has not been received.".to_string(),
        ),
    ]
}

fn capacity_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let small = t.capacity.small_mw;
    let large = t.capacity.large_mw;

    vec![
        Rule::new(
            "capacity_small",
            Capacity,
            move |c| c.inputs.installed_capacity_mw > 0.0 && c.inputs.installed_capacity_mw < small,
            |c| format!(
                "Installed capacity of {:.0} MW is small; fixed costs weigh more heavily per unit generated.",
                c.inputs.installed_capacity_mw
            ),
        ),
        Rule::new(
            "capacity_large",
            Capacity,
            move |c| c.inputs.installed_capacity_mw > large,
            |c| format!(
                "Installed capacity of {:.0} MW is large; stagger unit overhauls to keep fleet availability high.",
                c.inputs.installed_capacity_mw
            ),
        ),
    ]
}

// ============================================================================
// Compound (cross-field)
// ============================================================================

fn compound_rules(t: &ThresholdConfig) -> Vec<Rule> {
    let fuel_high = t.fuel_cost.high_per_unit;
    let tariff_low = t.tariff.low_per_unit;
    let plf_optimal = t.plf.optimal_percent;
    let intensity_high = t.emissions.intensity_high_t_per_mwh;
    let re_low = t.renewables.low_percent;
    let co2_high = t.emissions.co2_high_tonnes;

    vec![
        Rule::new(
            "fuel_high_tariff_low",
            Compound,
            move |c| c.inputs.fuel_cost_per_unit > fuel_high && c.inputs.avg_tariff < tariff_low,
            |c| format!(
                "Fuel cost is high (₹{:.2}/kWh) while tariff is low (₹{:.2}/kWh). Margins are squeezed from both sides; review fuel contracts and PPA pricing together.",
                c.inputs.fuel_cost_per_unit, c.inputs.avg_tariff
            ),
        ),
        Rule::new(
            "low_plf_high_intensity",
            Compound,
            move |c| {
                c.inputs.plf_pct < plf_optimal && c.intensity().is_some_and(|i| i > intensity_high)
            },
            |c| format!(
                "Low PLF ({:.1}%) with high emission intensity ({:.2} tCO₂/MWh) points to inefficient part-load operation. Consolidate load onto fewer, more efficient units.",
                c.inputs.plf_pct, c.intensity().unwrap_or_default()
            ),
        ),
        Rule::new(
            "loss_low_plf",
            Compound,
            move |c| c.metrics.profit_cr < 0.0 && c.inputs.plf_pct < plf_optimal,
            |c| format!(
                "Losses coincide with a PLF of {:.1}%. Raising load factor spreads fixed costs and is the first lever to restore profit.",
                c.inputs.plf_pct
            ),
        ),
        Rule::new(
            "re_low_co2_high",
            Compound,
            move |c| c.inputs.re_share_pct < re_low && c.prediction.co2_tonnes > co2_high,
            |c| format!(
                "Low renewable share ({:.1}%) with high absolute emissions. A renewable capacity plan would cut both CO₂ and fuel exposure.",
                c.inputs.re_share_pct
            ),
        ),
    ]
}
