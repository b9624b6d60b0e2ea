//! Database row types and their conversion to domain entities

use super::{StoreError, StoreResult};
use biz_core::analysis::{
    AnalysisSections, CompetitionAnalysis, CustomerAnalysis, FinancialAnalysis, MarketAnalysis,
    RiskAnalysis, SwotAnalysis,
};
use biz_core::report::{
    ActionItem, CompetitionSection, FinancialSection, MarketSection, ReportContent, RiskSection,
};
use biz_core::{Analysis, CollectedData, Idea, Report, Score, ScoreCard, User};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

fn parse<T>(value: &str) -> StoreResult<T>
where
    T: FromStr<Err = biz_core::CoreError>,
{
    value
        .parse()
        .map_err(|e: biz_core::CoreError| StoreError::Corrupt(e.to_string()))
}

fn parse_opt<T>(value: Option<&str>) -> StoreResult<Option<T>>
where
    T: FromStr<Err = biz_core::CoreError>,
{
    value.map(parse).transpose()
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            is_active: row.is_active,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct IdeaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub problem: String,
    pub target_customer: String,
    pub value_proposition: Option<String>,
    pub differentiation: Option<String>,
    pub constraints: Option<String>,
    pub industry: Option<String>,
    pub revenue_model: Option<String>,
    pub status: String,
    pub collected_data: Option<Json<CollectedData>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<IdeaRow> for Idea {
    type Error = StoreError;

    fn try_from(row: IdeaRow) -> StoreResult<Self> {
        Ok(Idea {
            id: row.id,
            owner_id: row.user_id,
            title: row.title,
            description: row.description,
            problem: row.problem,
            target_customer: row.target_customer,
            value_proposition: row.value_proposition,
            differentiation: row.differentiation,
            constraints: row.constraints,
            industry: parse_opt(row.industry.as_deref())?,
            revenue_model: parse_opt(row.revenue_model.as_deref())?,
            status: parse(&row.status)?,
            collected_data: row.collected_data.map(|Json(data)| data),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub status: String,
    pub market_score: Option<i16>,
    pub competition_score: Option<i16>,
    pub customer_demand_score: Option<i16>,
    pub financial_score: Option<i16>,
    pub execution_score: Option<i16>,
    pub risk_score: Option<i16>,
    pub overall_score: Option<i16>,
    pub swot_analysis: Option<Json<SwotAnalysis>>,
    pub market_analysis: Option<Json<MarketAnalysis>>,
    pub competition_analysis: Option<Json<CompetitionAnalysis>>,
    pub customer_analysis: Option<Json<CustomerAnalysis>>,
    pub financial_analysis: Option<Json<FinancialAnalysis>>,
    pub risk_analysis: Option<Json<RiskAnalysis>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisRow {
    /// All seven scores, or none.
    fn score_card(&self) -> StoreResult<Option<ScoreCard>> {
        let raw = [
            self.market_score,
            self.competition_score,
            self.customer_demand_score,
            self.financial_score,
            self.execution_score,
            self.risk_score,
            self.overall_score,
        ];
        if raw.iter().all(Option::is_none) {
            return Ok(None);
        }

        let mut scores = [Score::clamped(0); 7];
        for (slot, value) in scores.iter_mut().zip(raw) {
            let value = value.ok_or_else(|| {
                StoreError::Corrupt(format!("analysis {} has partial scores", self.id))
            })?;
            *slot = Score::try_from(i64::from(value)).map_err(StoreError::Corrupt)?;
        }
        let [market, competition, customer_demand, financial, execution, risk, overall] = scores;

        Ok(Some(ScoreCard {
            market_score: market,
            competition_score: competition,
            customer_demand_score: customer_demand,
            financial_score: financial,
            execution_score: execution,
            risk_score: risk,
            overall_score: overall,
        }))
    }
}

impl TryFrom<AnalysisRow> for Analysis {
    type Error = StoreError;

    fn try_from(row: AnalysisRow) -> StoreResult<Self> {
        let scores = row.score_card()?;
        Ok(Analysis {
            id: row.id,
            idea_id: row.idea_id,
            status: parse(&row.status)?,
            scores,
            sections: AnalysisSections {
                swot: row.swot_analysis.map(|Json(v)| v),
                market: row.market_analysis.map(|Json(v)| v),
                competition: row.competition_analysis.map(|Json(v)| v),
                customer: row.customer_analysis.map(|Json(v)| v),
                financial: row.financial_analysis.map(|Json(v)| v),
                risk: row.risk_analysis.map(|Json(v)| v),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

/// Column values for the seven score columns
pub fn score_columns(analysis: &Analysis) -> [Option<i16>; 7] {
    match &analysis.scores {
        Some(card) => card.all().map(|s| Some(i16::from(s.value()))),
        None => [None; 7],
    }
}

#[derive(Debug, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub status: String,
    pub report_type: String,
    pub executive_summary: Option<String>,
    pub recommendation: Option<String>,
    pub swot: Option<Json<SwotAnalysis>>,
    pub market_analysis: Option<Json<MarketSection>>,
    pub competition_analysis: Option<Json<CompetitionSection>>,
    pub financial_analysis: Option<Json<FinancialSection>>,
    pub risk_assessment: Option<Json<RiskSection>>,
    pub action_items: Option<Json<Vec<ActionItem>>>,
    pub key_insights: Option<Json<Vec<String>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReportRow> for Report {
    type Error = StoreError;

    fn try_from(row: ReportRow) -> StoreResult<Self> {
        let content = match (
            row.swot,
            row.market_analysis,
            row.competition_analysis,
            row.financial_analysis,
            row.risk_assessment,
            row.action_items,
            row.key_insights,
        ) {
            (
                Some(Json(swot)),
                Some(Json(market_analysis)),
                Some(Json(competition_analysis)),
                Some(Json(financial_analysis)),
                Some(Json(risk_assessment)),
                Some(Json(action_items)),
                Some(Json(key_insights)),
            ) => Some(ReportContent {
                swot,
                market_analysis,
                competition_analysis,
                financial_analysis,
                risk_assessment,
                action_items,
                key_insights,
            }),
            _ => None,
        };

        Ok(Report {
            id: row.id,
            idea_id: row.idea_id,
            status: parse(&row.status)?,
            report_type: parse(&row.report_type)?,
            executive_summary: row.executive_summary,
            recommendation: parse_opt(row.recommendation.as_deref())?,
            content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biz_core::AnalysisStatus;

    fn analysis_row(scores: [Option<i16>; 7]) -> AnalysisRow {
        let now = Utc::now();
        AnalysisRow {
            id: Uuid::new_v4(),
            idea_id: Uuid::new_v4(),
            status: "completed".to_string(),
            market_score: scores[0],
            competition_score: scores[1],
            customer_demand_score: scores[2],
            financial_score: scores[3],
            execution_score: scores[4],
            risk_score: scores[5],
            overall_score: scores[6],
            swot_analysis: None,
            market_analysis: None,
            competition_analysis: None,
            customer_analysis: None,
            financial_analysis: None,
            risk_analysis: None,
            created_at: now,
            updated_at: now,
            completed_at: Some(now),
        }
    }

    #[test]
    fn test_scores_round_trip_through_columns() {
        let row = analysis_row([Some(70), Some(60), Some(65), Some(55), Some(50), Some(58), Some(72)]);
        let analysis = Analysis::try_from(row).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Completed);
        assert_eq!(analysis.scores.unwrap().overall_score.value(), 72);
        assert_eq!(score_columns(&analysis)[6], Some(72));
    }

    #[test]
    fn test_partial_scores_are_corrupt() {
        let row = analysis_row([Some(70), None, None, None, None, None, None]);
        assert!(matches!(Analysis::try_from(row), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let mut row = analysis_row([None; 7]);
        row.status = "exploded".to_string();
        assert!(matches!(Analysis::try_from(row), Err(StoreError::Corrupt(_))));
    }
}
