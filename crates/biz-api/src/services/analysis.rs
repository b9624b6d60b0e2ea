//! Analysis stage

use super::{check_saved, fail_in_flight, log_recovery, owned_idea};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use biz_core::{Analysis, Idea, Trigger, User};
use tracing::{info, warn};
use uuid::Uuid;

async fn persist(state: &AppState, idea: &mut Idea, analysis: &Analysis) -> ApiResult<()> {
    let saved = state.store.save_analysis_stage(idea, analysis).await?;
    check_saved(idea, saved)
}

/// Write the finished or failed stage. If that write is lost, the idea must
/// not stay in `analyzing`.
async fn settle(state: &AppState, idea: &mut Idea, analysis: &mut Analysis) -> ApiResult<()> {
    let result = persist(state, idea, analysis).await;
    if result.is_err() {
        if let Some(stalled) = fail_in_flight(state, idea.id).await {
            analysis.fail();
            let saved = state.store.save_analysis_stage(&stalled, analysis).await;
            log_recovery(idea.id, saved);
        }
    }
    result
}

/// Run (or re-run) analysis. An existing analysis is reset and overwritten.
pub async fn start(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<Analysis> {
    let mut idea = owned_idea(state, user, idea_id).await?;
    idea.transition(Trigger::StartAnalysis)?;

    let mut analysis = match state.store.analysis_for_idea(idea.id).await? {
        Some(mut existing) => {
            existing.restart();
            existing
        }
        None => Analysis::start(idea.id),
    };
    persist(state, &mut idea, &analysis).await?;

    let provider = state.analyst.as_ref();
    info!(idea_id = %idea.id, provider = provider.name(), "analysis started");

    match provider.analyze(&idea).await {
        Ok(outcome) => {
            analysis.complete(outcome);
            idea.transition(Trigger::AnalysisFinished)?;
            settle(state, &mut idea, &mut analysis).await?;
            info!(idea_id = %idea.id, "analysis completed");
            Ok(analysis)
        }
        Err(e) => {
            warn!(idea_id = %idea.id, error = %e, "analysis failed");
            analysis.fail();
            idea.transition(Trigger::StageFailed)?;
            settle(state, &mut idea, &mut analysis).await?;
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// The idea's analysis; callers must not assume sections are populated.
pub async fn get(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<Analysis> {
    let idea = owned_idea(state, user, idea_id).await?;
    state
        .store
        .analysis_for_idea(idea.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Analysis"))
}
