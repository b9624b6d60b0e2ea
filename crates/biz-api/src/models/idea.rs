//! Idea, collection and analysis models

use biz_core::analysis::{
    key_insights, AnalysisSections, CompetitionAnalysis, CustomerAnalysis, FinancialAnalysis,
    MarketAnalysis, RiskAnalysis, SwotAnalysis,
};
use biz_core::{
    Analysis, AnalysisStatus, CollectionProgress, CollectionTask, Idea, IdeaStatus, IndustryType,
    Recommendation, RevenueModel, ScoreCard,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IdeaResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub problem: String,
    pub target_customer: String,
    pub value_proposition: Option<String>,
    pub differentiation: Option<String>,
    pub constraints: Option<String>,
    pub industry: Option<IndustryType>,
    pub revenue_model: Option<RevenueModel>,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Idea> for IdeaResponse {
    fn from(idea: Idea) -> Self {
        Self {
            id: idea.id,
            user_id: idea.owner_id,
            title: idea.title,
            description: idea.description,
            problem: idea.problem,
            target_customer: idea.target_customer,
            value_proposition: idea.value_proposition,
            differentiation: idea.differentiation,
            constraints: idea.constraints,
            industry: idea.industry,
            revenue_model: idea.revenue_model,
            status: idea.status,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdeaCreateResponse {
    pub idea_id: Uuid,
    pub status: IdeaStatus,
}

#[derive(Debug, Serialize)]
pub struct IdeaListResponse {
    pub ideas: Vec<IdeaResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
pub struct CollectResponse {
    pub idea_id: Uuid,
    pub status: IdeaStatus,
    pub tasks: Vec<CollectionTask>,
}

#[derive(Debug, Serialize)]
pub struct CollectStatusResponse {
    pub idea_id: Uuid,
    #[serde(flatten)]
    pub progress: CollectionProgress,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub idea_id: Uuid,
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
}

/// Scores and sections are `null` until the analysis has completed.
#[derive(Debug, Serialize)]
pub struct AnalysisResultResponse {
    pub analysis_id: Uuid,
    pub idea_id: Uuid,
    pub status: AnalysisStatus,
    pub scores: Option<ScoreCard>,
    pub swot: Option<SwotAnalysis>,
    pub market: Option<MarketAnalysis>,
    pub competition: Option<CompetitionAnalysis>,
    pub customer: Option<CustomerAnalysis>,
    pub financial: Option<FinancialAnalysis>,
    pub risk: Option<RiskAnalysis>,
    pub key_insights: Option<Vec<String>>,
    pub risks: Option<Vec<String>>,
    pub recommendation: Option<Recommendation>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Analysis> for AnalysisResultResponse {
    fn from(analysis: Analysis) -> Self {
        let scores = analysis.completed_scores().copied();
        let completed = scores.is_some();
        let risks = completed.then(|| analysis.key_risks());
        let sections = if completed {
            analysis.sections
        } else {
            AnalysisSections::default()
        };

        Self {
            analysis_id: analysis.id,
            idea_id: analysis.idea_id,
            status: analysis.status,
            scores,
            swot: sections.swot,
            market: sections.market,
            competition: sections.competition,
            customer: sections.customer,
            financial: sections.financial,
            risk: sections.risk,
            key_insights: completed.then(key_insights),
            risks,
            recommendation: scores.map(|s| Recommendation::from_score(s.overall_score)),
            created_at: analysis.created_at,
            completed_at: analysis.completed_at,
        }
    }
}
