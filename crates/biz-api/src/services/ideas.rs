//! Idea CRUD

use super::{owned_idea, save_idea};
use crate::error::ApiResult;
use crate::AppState;
use biz_core::{Idea, IdeaDraft, IdeaPatch, Page, User};
use tracing::info;
use uuid::Uuid;

pub async fn create(state: &AppState, user: &User, draft: IdeaDraft) -> ApiResult<Idea> {
    draft.validate()?;
    let idea = Idea::new(user.id, draft);
    state.store.create_idea(&idea).await?;
    info!(idea_id = %idea.id, user_id = %user.id, "idea created");
    Ok(idea)
}

pub async fn list(state: &AppState, user: &User, page: Page) -> ApiResult<(Vec<Idea>, i64)> {
    Ok(state.store.ideas_by_owner(user.id, page).await?)
}

pub async fn get(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<Idea> {
    owned_idea(state, user, idea_id).await
}

pub async fn update(
    state: &AppState,
    user: &User,
    idea_id: Uuid,
    patch: IdeaPatch,
) -> ApiResult<Idea> {
    let mut idea = owned_idea(state, user, idea_id).await?;
    idea.edit(patch)?;
    save_idea(state, &mut idea).await?;
    Ok(idea)
}

/// Soft delete, legal in every status
pub async fn delete(state: &AppState, user: &User, idea_id: Uuid) -> ApiResult<()> {
    let mut idea = owned_idea(state, user, idea_id).await?;
    idea.soft_delete();
    save_idea(state, &mut idea).await?;
    info!(idea_id = %idea.id, "idea soft-deleted");
    Ok(())
}
