//! Report stage

use super::{check_saved, fail_in_flight, log_recovery, owned_idea};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use biz_core::report::{render_report, synthesize, ReportFormat};
use biz_core::{Idea, Report, ReportType, Trigger, User};
use tracing::{info, warn};
use uuid::Uuid;

async fn persist(state: &AppState, idea: &mut Idea, report: &Report) -> ApiResult<()> {
    let saved = state.store.save_report_stage(idea, report).await?;
    check_saved(idea, saved)
}

/// Write the finished or failed report. If that write is lost, the idea
/// must not stay in `report_generating`.
async fn settle(state: &AppState, idea: &mut Idea, report: &mut Report) -> ApiResult<()> {
    let result = persist(state, idea, report).await;
    if result.is_err() {
        if let Some(stalled) = fail_in_flight(state, idea.id).await {
            report.fail();
            let saved = state.store.save_report_stage(&stalled, report).await;
            log_recovery(idea.id, saved);
        }
    }
    result
}

/// Generate a new report from the idea's completed analysis.
pub async fn create(
    state: &AppState,
    user: &User,
    idea_id: Uuid,
    report_type: ReportType,
) -> ApiResult<Report> {
    let mut idea = owned_idea(state, user, idea_id).await?;

    let analysis = state
        .store
        .analysis_for_idea(idea.id)
        .await?
        .filter(|a| a.is_completed())
        .ok_or_else(|| ApiError::Validation("analysis must complete before report".to_string()))?;

    idea.transition(Trigger::StartReport)?;
    let mut report = Report::begin(idea.id, report_type);
    persist(state, &mut idea, &report).await?;
    info!(idea_id = %idea.id, report_id = %report.id, "report generation started");

    match synthesize(&idea, &analysis) {
        Ok(synthesis) => {
            report.complete(synthesis);
            idea.transition(Trigger::ReportFinished)?;
            settle(state, &mut idea, &mut report).await?;
            info!(
                report_id = %report.id,
                recommendation = ?report.recommendation,
                "report completed"
            );
            Ok(report)
        }
        Err(e) => {
            warn!(report_id = %report.id, error = %e, "report generation failed");
            report.fail();
            idea.transition(Trigger::StageFailed)?;
            settle(state, &mut idea, &mut report).await?;
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// A report and its parent idea, after the ownership check
pub async fn get(state: &AppState, user: &User, report_id: Uuid) -> ApiResult<(Report, Idea)> {
    let report = state
        .store
        .report_by_id(report_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Report"))?;
    let idea = owned_idea(state, user, report.idea_id).await?;
    Ok((report, idea))
}

pub async fn list(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<Vec<Report>> {
    let idea = owned_idea(state, user, idea_id).await?;
    Ok(state.store.reports_for_idea(idea.id).await?)
}

pub async fn render(
    state: &AppState,
    user: &User,
    report_id: Uuid,
    format: ReportFormat,
) -> ApiResult<String> {
    let (report, idea) = get(state, user, report_id).await?;
    Ok(render_report(&report, &idea, format)?)
}
