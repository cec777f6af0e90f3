//! Plain-text rendering of estimates for terminals and notification bodies

use std::fmt::Write as _;

use crate::types::{AdvisoryMessage, DerivedMetrics, PredictionRecord, PredictionResult};

/// Two decimals with thousands grouping: `1234567.891` → `"1,234,567.89"`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && formatted != "0.00" {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

/// The five headline figures, one per line.
pub fn render_metrics(prediction: &PredictionResult, metrics: &DerivedMetrics) -> String {
    format!(
        "Power Generated: {:.2} BU\n\
         CO₂ Emissions: {} tonnes\n\
         Revenue: ₹{} Cr\n\
         Fuel Cost: ₹{} Cr\n\
         Profit: ₹{} Cr",
        prediction.power_bu,
        format_grouped(prediction.co2_tonnes),
        format_grouped(metrics.revenue_cr),
        format_grouped(metrics.cost_cr),
        format_grouped(metrics.profit_cr),
    )
}

pub fn render_advisories(advisories: &[AdvisoryMessage]) -> String {
    let mut out = String::from("Suggestions:");
    for message in advisories {
        let _ = write!(out, "\n  - [{}] {}", message.category, message.text);
    }
    out
}

/// Metrics followed by the advisory list.
pub fn render_record(record: &PredictionRecord) -> String {
    format!(
        "{}\n\n{}",
        render_metrics(record.prediction(), record.metrics()),
        render_advisories(record.advisories())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdvisoryCategory;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0.00");
        assert_eq!(format_grouped(999.999), "1,000.00");
        assert_eq!(format_grouped(120_000.0), "120,000.00");
        assert_eq!(format_grouped(1_234_567.891), "1,234,567.89");
        assert_eq!(format_grouped(-10_000.0), "-10,000.00");
        assert_eq!(format_grouped(-0.001), "0.00");
    }

    #[test]
    fn test_render_metrics_lines() {
        let text = render_metrics(
            &PredictionResult { power_bu: 300.0, co2_tonnes: 240_000_000.0 },
            &DerivedMetrics { revenue_cr: 120_000.0, cost_cr: 96_000.0, profit_cr: 24_000.0 },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Power Generated: 300.00 BU",
                "CO₂ Emissions: 240,000,000.00 tonnes",
                "Revenue: ₹120,000.00 Cr",
                "Fuel Cost: ₹96,000.00 Cr",
                "Profit: ₹24,000.00 Cr",
            ]
        );
    }

    #[test]
    fn test_power_is_not_grouped() {
        let text = render_metrics(
            &PredictionResult { power_bu: 1234.5, co2_tonnes: 1_500_000.0 },
            &DerivedMetrics { revenue_cr: 4_938.0, cost_cr: 3_950.4, profit_cr: 987.6 },
        );
        assert!(text.contains("Power Generated: 1234.50 BU"), "{text}");
        assert!(text.contains("CO₂ Emissions: 1,500,000.00 tonnes"));
        assert!(text.contains("Revenue: ₹4,938.00 Cr"));
    }

    #[test]
    fn test_render_advisories_keeps_order() {
        let text = render_advisories(&[
            AdvisoryMessage::new(AdvisoryCategory::LoadFactor, "first"),
            AdvisoryMessage::new(AdvisoryCategory::GeneralTip, "second"),
        ]);
        assert_eq!(text, "Suggestions:\n  - [Load Factor] first\n  - [Tip] second");
    }
}
