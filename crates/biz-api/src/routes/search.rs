//! Market search routes
//!
//! Stateless lookups: every request is answered from the configured
//! [`SearchProvider`](biz_core::SearchProvider) and nothing is stored.

use crate::auth::VerifiedUser;
use crate::error::ApiResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::models::SearchParams;
use crate::AppState;
use axum::{extract::State, Json};
use biz_core::{SearchKind, SearchQuery, SearchResponse};
use std::sync::Arc;

pub async fn search(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(kind): ApiPath<String>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let kind: SearchKind = kind.parse()?;
    let query = SearchQuery::new(&params.q, params.limit)?;

    tracing::debug!(user_id = %user.id, %kind, provider = state.search.name(), "search");
    let response = state.search.search(kind, &query).await?;
    Ok(Json(response))
}
