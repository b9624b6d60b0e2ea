//! Data collection stage

use super::{fail_in_flight, log_recovery, owned_idea, save_idea};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use biz_core::collection::progress_for;
use biz_core::{CollectionProgress, CollectionTask, Idea, IdeaStatus, Trigger, User};
use tracing::{info, warn};
use uuid::Uuid;

/// Result of starting collection: the status entered and the tasks run
pub struct CollectionStarted {
    pub idea_id: Uuid,
    pub status: IdeaStatus,
    pub tasks: Vec<CollectionTask>,
}

/// Write the settled idea. If that write is lost, the idea must not stay in
/// `collecting`.
async fn settle(state: &AppState, idea: &mut Idea) -> ApiResult<()> {
    let result = save_idea(state, idea).await;
    if result.is_err() {
        if let Some(stalled) = fail_in_flight(state, idea.id).await {
            log_recovery(idea.id, state.store.save_idea(&stalled).await);
        }
    }
    result
}

/// Enter `collecting`, run the provider, then record the data and enter
/// `collected`. Provider failure moves the idea to `failed`.
pub async fn start(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<CollectionStarted> {
    let mut idea = owned_idea(state, user, idea_id).await?;
    let entered = idea.transition(Trigger::StartCollection)?;
    save_idea(state, &mut idea).await?;

    let provider = state.collector.as_ref();
    info!(idea_id = %idea.id, provider = provider.name(), "collection started");

    match provider.collect(&idea).await {
        Ok(data) => {
            idea.collected_data = Some(data);
            idea.transition(Trigger::CollectionFinished)?;
            settle(state, &mut idea).await?;
            info!(idea_id = %idea.id, "collection finished");
        }
        Err(e) => {
            warn!(idea_id = %idea.id, error = %e, "collection failed");
            idea.transition(Trigger::StageFailed)?;
            settle(state, &mut idea).await?;
            return Err(ApiError::Internal(e.to_string()));
        }
    }

    Ok(CollectionStarted {
        idea_id: idea.id,
        status: entered,
        tasks: provider.tasks().to_vec(),
    })
}

pub async fn status(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<CollectionProgress> {
    let idea = owned_idea(state, user, idea_id).await?;
    Ok(progress_for(state.collector.as_ref(), &idea).await)
}
