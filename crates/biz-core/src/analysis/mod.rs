//! Feasibility analysis stage
//!
//! An idea has at most one [`Analysis`]. Re-running the stage resets and
//! overwrites it; no history is kept.

pub mod sections;
pub mod simulated;

use crate::idea::Idea;
use crate::CoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use sections::{
    AnalysisSections, CompetitionAnalysis, CustomerAnalysis, FinancialAnalysis, MarketAnalysis,
    RiskAnalysis, SwotAnalysis,
};
pub use simulated::SimulatedAnalyst;

text_enum! {
    pub enum AnalysisStatus as "analysis status" {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

/// A score in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    /// Saturates into `0..=100`.
    pub fn clamped(value: i64) -> Self {
        Score(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(format!("score {value} is outside 0..=100"))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Six sub-scores plus an independently computed overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub market_score: Score,
    pub competition_score: Score,
    pub customer_demand_score: Score,
    pub financial_score: Score,
    pub execution_score: Score,
    pub risk_score: Score,
    pub overall_score: Score,
}

impl ScoreCard {
    pub fn all(&self) -> [Score; 7] {
        [
            self.market_score,
            self.competition_score,
            self.customer_demand_score,
            self.financial_score,
            self.execution_score,
            self.risk_score,
            self.overall_score,
        ]
    }
}

/// What an analysis provider produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub scores: ScoreCard,
    pub sections: AnalysisSections,
}

/// Stored analysis of one idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub status: AnalysisStatus,
    pub scores: Option<ScoreCard>,
    pub sections: AnalysisSections,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Analysis {
    /// A fresh analysis, already in progress
    pub fn start(idea_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            idea_id,
            status: AnalysisStatus::InProgress,
            scores: None,
            sections: AnalysisSections::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Reset for a re-run, discarding previous results
    pub fn restart(&mut self) {
        self.status = AnalysisStatus::InProgress;
        self.scores = None;
        self.sections = AnalysisSections::default();
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, outcome: AnalysisOutcome) {
        let now = Utc::now();
        self.status = AnalysisStatus::Completed;
        self.scores = Some(outcome.scores);
        self.sections = outcome.sections;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn fail(&mut self) {
        self.status = AnalysisStatus::Failed;
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.status == AnalysisStatus::Completed
    }

    /// Scores, only once the analysis has completed
    pub fn completed_scores(&self) -> Option<&ScoreCard> {
        if self.is_completed() {
            self.scores.as_ref()
        } else {
            None
        }
    }

    pub fn key_risks(&self) -> Vec<String> {
        self.sections
            .risk
            .as_ref()
            .map(|r| r.key_risks.clone())
            .unwrap_or_default()
    }
}

/// Headline observations attached to every completed analysis and report
pub fn key_insights() -> Vec<String> {
    [
        "Digital adoption in the target market is accelerating, so the entry timing is favourable.",
        "Consumer acceptance of AI-assisted services is growing quickly.",
        "A subscription model supports predictable recurring revenue.",
        "Early customer acquisition needs a differentiated marketing strategy.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Produces scores and sections for an idea
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name for logs and errors
    fn name(&self) -> &'static str;

    /// Analyze `idea`. All scores must land in `0..=100`.
    async fn analyze(&self, idea: &Idea) -> CoreResult<AnalysisOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(overall: i64) -> ScoreCard {
        ScoreCard {
            market_score: Score::clamped(70),
            competition_score: Score::clamped(60),
            customer_demand_score: Score::clamped(65),
            financial_score: Score::clamped(55),
            execution_score: Score::clamped(50),
            risk_score: Score::clamped(58),
            overall_score: Score::clamped(overall),
        }
    }

    #[test]
    fn test_score_clamps() {
        assert_eq!(Score::clamped(-5).value(), 0);
        assert_eq!(Score::clamped(140).value(), 100);
        assert_eq!(Score::clamped(42).value(), 42);
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<Score>("100").unwrap().value(), 100);
        assert!(serde_json::from_str::<Score>("101").is_err());
        assert!(serde_json::from_str::<Score>("-1").is_err());
        assert_eq!(serde_json::to_string(&Score::clamped(7)).unwrap(), "7");
    }

    #[test]
    fn test_restart_discards_results() {
        let mut analysis = Analysis::start(Uuid::new_v4());
        analysis.complete(AnalysisOutcome {
            scores: card(80),
            sections: AnalysisSections {
                risk: Some(RiskAnalysis {
                    key_risks: vec!["Churn".into()],
                    mitigation_strategies: vec![],
                }),
                ..Default::default()
            },
        });
        assert!(analysis.is_completed());
        assert_eq!(analysis.key_risks(), vec!["Churn".to_string()]);

        let id = analysis.id;
        analysis.restart();
        assert_eq!(analysis.id, id);
        assert_eq!(analysis.status, AnalysisStatus::InProgress);
        assert!(analysis.scores.is_none());
        assert!(analysis.sections.is_empty());
        assert!(analysis.completed_at.is_none());
    }

    #[test]
    fn test_scores_hidden_until_completed() {
        let mut analysis = Analysis::start(Uuid::new_v4());
        analysis.scores = Some(card(80));
        assert!(analysis.completed_scores().is_none());
        analysis.status = AnalysisStatus::Completed;
        assert_eq!(analysis.completed_scores().unwrap().overall_score.value(), 80);
    }
}
