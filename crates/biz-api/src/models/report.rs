//! Report models

use biz_core::analysis::SwotAnalysis;
use biz_core::report::{ActionItem, CompetitionSection, FinancialSection, MarketSection, RiskSection};
use biz_core::{Recommendation, Report, ReportStatus, ReportType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct CreateReportRequest {
    #[serde(default)]
    pub report_type: Option<ReportType>,
}

#[derive(Debug, Serialize)]
pub struct ReportGenerateResponse {
    pub report_id: Uuid,
    pub idea_id: Uuid,
    pub status: ReportStatus,
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_id: Uuid,
    pub idea_id: Uuid,
    pub status: ReportStatus,
    pub report_type: ReportType,
    pub executive_summary: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub swot: Option<SwotAnalysis>,
    pub market_analysis: Option<MarketSection>,
    pub competition_analysis: Option<CompetitionSection>,
    pub financial_analysis: Option<FinancialSection>,
    pub risk_assessment: Option<RiskSection>,
    pub action_items: Option<Vec<ActionItem>>,
    pub key_insights: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        // Sections are only exposed once the report is complete.
        let content = if report.is_completed() {
            report.content
        } else {
            None
        };
        let (swot, market, competition, financial, risk, actions, insights) = match content {
            Some(c) => (
                Some(c.swot),
                Some(c.market_analysis),
                Some(c.competition_analysis),
                Some(c.financial_analysis),
                Some(c.risk_assessment),
                Some(c.action_items),
                Some(c.key_insights),
            ),
            None => (None, None, None, None, None, None, None),
        };

        Self {
            report_id: report.id,
            idea_id: report.idea_id,
            status: report.status,
            report_type: report.report_type,
            executive_summary: report.executive_summary,
            recommendation: report.recommendation,
            swot,
            market_analysis: market,
            competition_analysis: competition,
            financial_analysis: financial,
            risk_assessment: risk,
            action_items: actions,
            key_insights: insights,
            created_at: report.created_at,
            completed_at: report.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}
