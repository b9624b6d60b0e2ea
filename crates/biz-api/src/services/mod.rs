//! Business logic behind the routes
//!
//! Every idea-scoped operation starts from [`owned_idea`], which enforces
//! existence before ownership. Reports reach their owner only through the
//! parent idea.

pub mod analysis;
pub mod auth;
pub mod collection;
pub mod ideas;
pub mod reports;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use biz_core::{Idea, Trigger, User};
use uuid::Uuid;

/// Load a live idea and check that `user` owns it.
pub async fn owned_idea(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<Idea> {
    let idea = state
        .store
        .idea_by_id(idea_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Idea"))?;

    if !idea.is_owned_by(user.id) {
        tracing::warn!(idea_id = %idea.id, user_id = %user.id, "cross-user idea access");
        return Err(ApiError::Forbidden(
            "You do not have access to this idea".to_string(),
        ));
    }
    Ok(idea)
}

/// Turn a lost compare-and-set into `Conflict`, or bump the local version.
pub(crate) fn check_saved(idea: &mut Idea, saved: bool) -> ApiResult<()> {
    if !saved {
        return Err(ApiError::Conflict(
            "Idea was modified by another request; retry".to_string(),
        ));
    }
    idea.version += 1;
    Ok(())
}

pub(crate) async fn save_idea(state: &AppState, idea: &mut Idea) -> ApiResult<()> {
    let saved = state.store.save_idea(idea).await?;
    check_saved(idea, saved)
}

/// Reload an idea whose settling write was lost. If it is still in flight,
/// return it moved to `failed` for the caller to write back.
pub(crate) async fn fail_in_flight(state: &AppState, idea_id: Uuid) -> Option<Idea> {
    let mut idea = match state.store.idea_by_id(idea_id).await {
        Ok(Some(idea)) if idea.status.is_in_flight() => idea,
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!(%idea_id, error = %e, "could not reload idea after lost write");
            return None;
        }
    };
    idea.transition(Trigger::StageFailed).ok()?;
    Some(idea)
}

/// Log the outcome of a best-effort write made by [`fail_in_flight`] callers.
pub(crate) fn log_recovery(idea_id: Uuid, result: crate::db::StoreResult<bool>) {
    match result {
        Ok(true) => tracing::warn!(%idea_id, "stalled stage marked failed"),
        Ok(false) => tracing::warn!(%idea_id, "stalled stage changed again; left as is"),
        Err(e) => tracing::error!(%idea_id, error = %e, "could not mark stalled stage failed"),
    }
}
