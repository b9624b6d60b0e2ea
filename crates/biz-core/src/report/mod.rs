//! Report synthesis stage
//!
//! A report is assembled from a completed [`Analysis`]. The recommendation is
//! a pure function of the overall score; every section follows the fallback
//! merge in [`sections`].

pub mod json;
pub mod markdown;
pub mod sections;

use crate::analysis::{key_insights, Analysis, Score, SwotAnalysis};
use crate::idea::Idea;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use sections::{
    ActionItem, CompetitionSection, FinancialSection, MarketSection, RiskItem, RiskSection,
};

text_enum! {
    pub enum ReportStatus as "report status" {
        Generating => "generating",
        Completed => "completed",
        Failed => "failed",
    }
}

text_enum! {
    pub enum ReportType as "report type" {
        Basic => "basic",
        Detailed => "detailed",
        Executive => "executive",
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Basic
    }
}

text_enum! {
    /// Go / No-Go verdict derived from the overall score
    pub enum Recommendation as "recommendation" {
        Go => "Go",
        Conditional => "Conditional",
        NoGo => "No-Go",
    }
}

impl Recommendation {
    pub const GO_THRESHOLD: u8 = 70;
    pub const CONDITIONAL_THRESHOLD: u8 = 55;

    pub fn from_score(overall: Score) -> Self {
        match overall.value() {
            s if s >= Self::GO_THRESHOLD => Recommendation::Go,
            s if s >= Self::CONDITIONAL_THRESHOLD => Recommendation::Conditional,
            _ => Recommendation::NoGo,
        }
    }
}

text_enum! {
    /// Render target for report downloads
    pub enum ReportFormat as "report format" {
        Markdown => "markdown",
        Json => "json",
    }
}

impl ReportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Markdown
    }
}

/// Render `report` for download
pub fn render_report(report: &Report, idea: &Idea, format: ReportFormat) -> CoreResult<String> {
    match format {
        ReportFormat::Markdown => markdown::generate(report, idea),
        ReportFormat::Json => json::generate(report),
    }
}

/// Assembled sections of a completed report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    pub swot: SwotAnalysis,
    pub market_analysis: MarketSection,
    pub competition_analysis: CompetitionSection,
    pub financial_analysis: FinancialSection,
    pub risk_assessment: RiskSection,
    pub action_items: Vec<ActionItem>,
    pub key_insights: Vec<String>,
}

/// Output of [`synthesize`]
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub executive_summary: String,
    pub recommendation: Recommendation,
    pub content: ReportContent,
}

/// Build report content from a completed analysis.
pub fn synthesize(idea: &Idea, analysis: &Analysis) -> CoreResult<Synthesis> {
    if analysis.idea_id != idea.id {
        return Err(CoreError::validation("analysis belongs to a different idea"));
    }
    let scores = analysis
        .completed_scores()
        .ok_or_else(|| CoreError::validation("analysis must complete before report"))?;

    let overall = scores.overall_score;
    let recommendation = Recommendation::from_score(overall);
    let sections = &analysis.sections;

    let content = ReportContent {
        swot: sections::swot_from_analysis(sections),
        market_analysis: MarketSection::from_analysis(sections.market.as_ref()),
        competition_analysis: CompetitionSection::from_analysis(sections),
        financial_analysis: FinancialSection::from_analysis(sections),
        risk_assessment: RiskSection::from_analysis(sections.risk.as_ref()),
        action_items: sections::default_action_items(),
        key_insights: key_insights(),
    };

    Ok(Synthesis {
        executive_summary: executive_summary(idea, overall, recommendation),
        recommendation,
        content,
    })
}

fn executive_summary(idea: &Idea, overall: Score, recommendation: Recommendation) -> String {
    let verdict = match recommendation {
        Recommendation::Go => "We recommend pursuing the business.",
        Recommendation::Conditional => {
            "The business is viable under conditions; address the risks below first."
        }
        Recommendation::NoGo => "The business needs careful reconsideration before investment.",
    };

    format!(
        "This summarises the feasibility analysis of the business idea \"{title}\".\n\n\
         The overall score is {overall}/100 ({recommendation}). {verdict}\n\n\
         Key strengths are a differentiated service and a clearly defined target market \
         ({customer}), with growth opportunities from ongoing digital transformation.\n\n\
         Upfront investment and rising competition need active risk management, and a \
         concrete customer-acquisition plan should be prepared.",
        title = idea.title,
        customer = idea.target_customer,
    )
}

/// A generated report. Reports have no owner of their own; access is
/// resolved through the parent idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub status: ReportStatus,
    pub report_type: ReportType,
    pub executive_summary: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub content: Option<ReportContent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn begin(idea_id: Uuid, report_type: ReportType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            idea_id,
            status: ReportStatus::Generating,
            report_type,
            executive_summary: None,
            recommendation: None,
            content: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn complete(&mut self, synthesis: Synthesis) {
        let now = Utc::now();
        self.status = ReportStatus::Completed;
        self.executive_summary = Some(synthesis.executive_summary);
        self.recommendation = Some(synthesis.recommendation);
        self.content = Some(synthesis.content);
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn fail(&mut self) {
        self.status = ReportStatus::Failed;
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReportStatus::Completed
    }
}
