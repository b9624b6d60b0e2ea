//! Report sections and the analysis-to-report fallback merge
//!
//! Each report section has a `Default` holding the template content. A
//! section built `from_analysis` takes every field the analysis provides and
//! the default for every field it does not.

use crate::analysis::{AnalysisSections, MarketAnalysis, RiskAnalysis, SwotAnalysis};
use serde::{Deserialize, Serialize};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Keep `value` unless it is empty, else use `fallback`.
fn or_default(value: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn default_swot() -> SwotAnalysis {
    SwotAnalysis {
        strengths: strings(&[
            "Differentiated AI-driven service",
            "Clear target market",
            "Scalable model",
        ]),
        weaknesses: strings(&["Upfront capital", "Technology dependency", "Time to build trust"]),
        opportunities: strings(&["Market growth", "Digital transformation", "B2B expansion"]),
        threats: strings(&["Incumbent entry", "Regulatory change", "Technology shifts"]),
    }
}

/// SWOT is taken whole from the analysis when present.
pub fn swot_from_analysis(sections: &AnalysisSections) -> SwotAnalysis {
    sections.swot.clone().unwrap_or_else(default_swot)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSection {
    pub tam: String,
    pub sam: String,
    pub som: String,
    pub cagr: String,
    pub market_trends: Vec<String>,
    pub target_segments: Vec<String>,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            tam: "$12B".to_string(),
            sam: "$2B".to_string(),
            som: "$40M".to_string(),
            cagr: "12.5%".to_string(),
            market_trends: strings(&[
                "Rising demand for AI-based services",
                "Accelerating digital transformation",
                "Active startup ecosystem",
            ]),
            target_segments: strings(&[
                "Aspiring founders",
                "Early-stage startup teams",
                "Corporate new-business units",
            ]),
        }
    }
}

impl MarketSection {
    pub fn from_analysis(market: Option<&MarketAnalysis>) -> Self {
        let defaults = Self::default();
        let Some(market) = market else {
            return defaults;
        };

        Self {
            tam: market.tam.clone().unwrap_or(defaults.tam),
            sam: market.sam.clone().unwrap_or(defaults.sam),
            som: market.som.clone().unwrap_or(defaults.som),
            cagr: market.cagr.clone().unwrap_or(defaults.cagr),
            market_trends: or_default(market.trends.clone(), defaults.market_trends),
            target_segments: defaults.target_segments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub strength: String,
    pub weakness: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCompetitor {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionSection {
    pub direct_competitors: Vec<Competitor>,
    pub indirect_competitors: Vec<IndirectCompetitor>,
    pub competitive_advantages: Vec<String>,
    pub market_position: String,
}

impl Default for CompetitionSection {
    fn default() -> Self {
        Self {
            direct_competitors: vec![
                Competitor {
                    name: "Competitor A".to_string(),
                    strength: "Brand awareness".to_string(),
                    weakness: "High price".to_string(),
                },
                Competitor {
                    name: "Competitor B".to_string(),
                    strength: "Technology".to_string(),
                    weakness: "Poor usability".to_string(),
                },
            ],
            indirect_competitors: vec![
                IndirectCompetitor {
                    name: "Consulting firms".to_string(),
                    description: "Traditional consulting services".to_string(),
                },
                IndirectCompetitor {
                    name: "General-purpose AI".to_string(),
                    description: "General chat assistants".to_string(),
                },
            ],
            competitive_advantages: strings(&[
                "AI specialised in business analysis",
                "Automated report generation",
                "Reasonable pricing",
            ]),
            market_position: "challenger".to_string(),
        }
    }
}

impl CompetitionSection {
    pub fn from_analysis(sections: &AnalysisSections) -> Self {
        let defaults = Self::default();
        let position = sections
            .competition
            .as_ref()
            .and_then(|c| c.competitive_position.clone());

        Self {
            market_position: position.unwrap_or(defaults.market_position),
            ..defaults
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueProjection {
    pub year: u32,
    pub revenue: String,
    pub profit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSection {
    pub initial_investment: String,
    pub monthly_costs: String,
    pub break_even_period: String,
    pub revenue_projections: Vec<RevenueProjection>,
    pub profitability_index: f64,
}

impl Default for FinancialSection {
    fn default() -> Self {
        let projection = |year, revenue: &str, profit: &str| RevenueProjection {
            year,
            revenue: revenue.to_string(),
            profit: profit.to_string(),
        };

        Self {
            initial_investment: "$40K".to_string(),
            monthly_costs: "$12K".to_string(),
            break_even_period: "18 months".to_string(),
            revenue_projections: vec![
                projection(1, "$160K", "-$80K"),
                projection(2, "$640K", "$80K"),
                projection(3, "$1.6M", "$400K"),
            ],
            profitability_index: 1.8,
        }
    }
}

impl FinancialSection {
    pub fn from_analysis(sections: &AnalysisSections) -> Self {
        let defaults = Self::default();
        let Some(financial) = sections.financial.as_ref() else {
            return defaults;
        };

        Self {
            initial_investment: financial
                .initial_investment
                .clone()
                .unwrap_or(defaults.initial_investment),
            monthly_costs: financial
                .monthly_burn_rate
                .clone()
                .unwrap_or(defaults.monthly_costs),
            break_even_period: financial
                .break_even_period
                .clone()
                .unwrap_or(defaults.break_even_period),
            ..defaults
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    pub impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSection {
    pub high_risks: Vec<RiskItem>,
    pub medium_risks: Vec<RiskItem>,
    pub low_risks: Vec<RiskItem>,
    pub mitigation_strategies: Vec<String>,
}

impl Default for RiskSection {
    fn default() -> Self {
        let item = |risk: &str, impact: &str, mitigation: &str| RiskItem {
            risk: risk.to_string(),
            impact: impact.to_string(),
            mitigation: mitigation.to_string(),
        };

        Self {
            high_risks: vec![item(
                "Pace of technology change",
                "Loss of competitiveness",
                "Continuous R&D investment",
            )],
            medium_risks: vec![
                item("Intensifying competition", "Market share loss", "Differentiation strategy"),
                item("Regulatory change", "Higher operating cost", "Compliance programme"),
            ],
            low_risks: vec![item("Staff turnover", "Development delays", "Retain key people")],
            mitigation_strategies: strings(&[
                "Continuous technical innovation",
                "Improve from customer feedback",
                "Build strategic partnerships",
            ]),
        }
    }
}

impl RiskSection {
    pub fn from_analysis(risk: Option<&RiskAnalysis>) -> Self {
        let defaults = Self::default();
        match risk {
            Some(risk) => Self {
                mitigation_strategies: or_default(
                    risk.mitigation_strategies.clone(),
                    defaults.mitigation_strategies.clone(),
                ),
                ..defaults
            },
            None => defaults,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    pub description: String,
    pub timeline: String,
    pub priority: String,
}

pub fn default_action_items() -> Vec<ActionItem> {
    let item = |title: &str, description: &str, timeline: &str, priority: &str| ActionItem {
        title: title.to_string(),
        description: description.to_string(),
        timeline: timeline.to_string(),
        priority: priority.to_string(),
    };

    vec![
        item("Build the MVP", "Ship a minimum product around the core features", "months 1-3", "high"),
        item("Beta test", "Collect early user feedback and iterate", "months 3-6", "high"),
        item("Market entry", "Marketing campaign and full launch", "months 6-9", "medium"),
    ]
}
