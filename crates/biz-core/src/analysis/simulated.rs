//! Randomized stand-in for AI analysis
//!
//! Each score is a fixed baseline plus a bounded random offset. Sections are
//! fixed templates.

use super::{
    AnalysisOutcome, AnalysisProvider, AnalysisSections, CompetitionAnalysis, CustomerAnalysis,
    FinancialAnalysis, MarketAnalysis, RiskAnalysis, Score, ScoreCard, SwotAnalysis,
};
use crate::idea::Idea;
use crate::CoreResult;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// (baseline, max offset) per score
const MARKET: (i64, i64) = (65, 25);
const COMPETITION: (i64, i64) = (50, 30);
const CUSTOMER_DEMAND: (i64, i64) = (60, 25);
const FINANCIAL: (i64, i64) = (55, 30);
const EXECUTION: (i64, i64) = (50, 35);
const RISK: (i64, i64) = (55, 30);
const OVERALL: (i64, i64) = (60, 25);

pub struct SimulatedAnalyst {
    rng: Mutex<StdRng>,
}

impl SimulatedAnalyst {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible scores for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn scores(&self) -> ScoreCard {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut roll = |(base, spread): (i64, i64)| Score::clamped(base + rng.random_range(0..=spread));

        ScoreCard {
            market_score: roll(MARKET),
            competition_score: roll(COMPETITION),
            customer_demand_score: roll(CUSTOMER_DEMAND),
            financial_score: roll(FINANCIAL),
            execution_score: roll(EXECUTION),
            risk_score: roll(RISK),
            overall_score: roll(OVERALL),
        }
    }

    fn sections(idea: &Idea) -> AnalysisSections {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        AnalysisSections {
            swot: Some(SwotAnalysis {
                strengths: strings(&[
                    "Differentiated AI-driven service",
                    "Clearly defined target market",
                    "Scalable business model",
                ]),
                weaknesses: strings(&[
                    "Requires upfront capital",
                    "High dependency on technology",
                    "Customer trust takes time to build",
                ]),
                opportunities: strings(&[
                    "Growing market size",
                    "Digital transformation trend",
                    "Potential B2B expansion",
                ]),
                threats: strings(&[
                    "Entry of large incumbents",
                    "Regulatory change",
                    "Fast-moving technology",
                ]),
            }),
            market: Some(MarketAnalysis {
                tam: Some("$12B".to_string()),
                sam: Some("$2B".to_string()),
                som: Some("$40M".to_string()),
                cagr: Some("12.5%".to_string()),
                trends: strings(&[
                    "Rising demand for AI-based services",
                    "Accelerating digital transformation",
                    "Active startup ecosystem",
                ]),
            }),
            competition: Some(CompetitionAnalysis {
                direct_competitors: Some(3),
                indirect_competitors: Some(10),
                competitive_position: Some("challenger".to_string()),
                barriers_to_entry: Some("medium".to_string()),
            }),
            customer: Some(CustomerAnalysis {
                segments: vec![idea.target_customer.clone()],
                pain_points: vec![idea.problem.clone()],
                willingness_to_pay: Some("moderate".to_string()),
            }),
            financial: Some(FinancialAnalysis {
                initial_investment: Some("$40K".to_string()),
                monthly_burn_rate: Some("$12K".to_string()),
                break_even_period: Some("18 months".to_string()),
                expected_roi: Some("150%".to_string()),
            }),
            risk: Some(RiskAnalysis {
                key_risks: strings(&[
                    "Update costs driven by the pace of technology",
                    "Large companies launching similar services",
                    "Stricter data-protection regulation",
                    "Rising customer acquisition cost",
                ]),
                mitigation_strategies: strings(&[
                    "Sustained R&D investment",
                    "Sharper differentiation",
                    "Compliance programme",
                ]),
            }),
        }
    }
}

impl Default for SimulatedAnalyst {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisProvider for SimulatedAnalyst {
    fn name(&self) -> &'static str {
        "simulated-analyst"
    }

    async fn analyze(&self, idea: &Idea) -> CoreResult<AnalysisOutcome> {
        Ok(AnalysisOutcome {
            scores: self.scores(),
            sections: Self::sections(idea),
        })
    }
}
