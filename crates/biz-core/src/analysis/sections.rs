//! Structured analysis sections
//!
//! Fields are optional: a provider may fill only part of a section, and the
//! report stage falls back to defaults for whatever is missing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    #[serde(default)]
    pub tam: Option<String>,
    #[serde(default)]
    pub sam: Option<String>,
    #[serde(default)]
    pub som: Option<String>,
    #[serde(default)]
    pub cagr: Option<String>,
    #[serde(default)]
    pub trends: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionAnalysis {
    #[serde(default)]
    pub direct_competitors: Option<u32>,
    #[serde(default)]
    pub indirect_competitors: Option<u32>,
    #[serde(default)]
    pub competitive_position: Option<String>,
    #[serde(default)]
    pub barriers_to_entry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerAnalysis {
    #[serde(default)]
    pub segments: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub willingness_to_pay: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    #[serde(default)]
    pub initial_investment: Option<String>,
    #[serde(default)]
    pub monthly_burn_rate: Option<String>,
    #[serde(default)]
    pub break_even_period: Option<String>,
    #[serde(default)]
    pub expected_roi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub mitigation_strategies: Vec<String>,
}

/// All sections of one analysis; any may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub swot: Option<SwotAnalysis>,
    pub market: Option<MarketAnalysis>,
    pub competition: Option<CompetitionAnalysis>,
    pub customer: Option<CustomerAnalysis>,
    pub financial: Option<FinancialAnalysis>,
    pub risk: Option<RiskAnalysis>,
}

impl AnalysisSections {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
