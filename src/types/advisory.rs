//! Advisory types: AdvisoryCategory, AdvisoryMessage

use serde::{Deserialize, Serialize};

/// Informational grouping for advisory messages.
///
/// Categories carry no severity; operators read messages in emission order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AdvisoryCategory {
    VerifyInputs,
    Financial,
    LoadFactor,
    FuelCost,
    Tariff,
    Emissions,
    Renewables,
    FuelSupply,
    Capacity,
    Compound,
    GeneralTip,
    AllOptimal,
}

impl std::fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryCategory::VerifyInputs => write!(f, "Verify Inputs"),
            AdvisoryCategory::Financial => write!(f, "Financial"),
            AdvisoryCategory::LoadFactor => write!(f, "Load Factor"),
            AdvisoryCategory::FuelCost => write!(f, "Fuel Cost"),
            AdvisoryCategory::Tariff => write!(f, "Tariff"),
            AdvisoryCategory::Emissions => write!(f, "Emissions"),
            AdvisoryCategory::Renewables => write!(f, "Renewables"),
            AdvisoryCategory::FuelSupply => write!(f, "Fuel Supply"),
            AdvisoryCategory::Capacity => write!(f, "Capacity"),
            AdvisoryCategory::Compound => write!(f, "Compound"),
            AdvisoryCategory::GeneralTip => write!(f, "Tip"),
            AdvisoryCategory::AllOptimal => write!(f, "All Optimal"),
        }
    }
}

/// One operational suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub category: AdvisoryCategory,
    pub text: String,
}

impl AdvisoryMessage {
    pub fn new(category: AdvisoryCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for AdvisoryMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
