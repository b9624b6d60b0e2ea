//! Idea, collection and analysis routes

use crate::auth::VerifiedUser;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{
    AnalysisResultResponse, AnalyzeResponse, CollectResponse, CollectStatusResponse,
    IdeaCreateResponse, IdeaListResponse, IdeaResponse, PageQuery, SuccessResponse,
};
use crate::services;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use biz_core::{IdeaDraft, IdeaPatch, Page};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_idea(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiJson(draft): ApiJson<IdeaDraft>,
) -> ApiResult<(StatusCode, Json<IdeaCreateResponse>)> {
    let idea = services::ideas::create(&state, &user, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(IdeaCreateResponse {
            idea_id: idea.id,
            status: idea.status,
        }),
    ))
}

pub async fn list_ideas(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<IdeaListResponse>> {
    let page = Page::new(query.page, query.page_size)?;
    let (ideas, total) = services::ideas::list(&state, &user, page).await?;

    Ok(Json(IdeaListResponse {
        ideas: ideas.into_iter().map(IdeaResponse::from).collect(),
        total,
        page: page.page,
        page_size: page.page_size,
    }))
}

pub async fn get_idea(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<IdeaResponse>> {
    let idea = services::ideas::get(&state, &user, id).await?;
    Ok(Json(idea.into()))
}

pub async fn update_idea(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<IdeaPatch>,
) -> ApiResult<Json<IdeaResponse>> {
    let idea = services::ideas::update(&state, &user, id, patch).await?;
    Ok(Json(idea.into()))
}

pub async fn delete_idea(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    services::ideas::delete(&state, &user, id).await?;
    Ok(Json(SuccessResponse::new("Idea deleted")))
}

pub async fn start_collection(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<(StatusCode, Json<CollectResponse>)> {
    let started = services::collection::start(&state, &user, id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(CollectResponse {
            idea_id: started.idea_id,
            status: started.status,
            tasks: started.tasks,
        }),
    ))
}

pub async fn collection_status(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<CollectStatusResponse>> {
    let progress = services::collection::status(&state, &user, id).await?;
    Ok(Json(CollectStatusResponse {
        idea_id: id,
        progress,
    }))
}

pub async fn start_analysis(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<(StatusCode, Json<AnalyzeResponse>)> {
    let analysis = services::analysis::start(&state, &user, id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            idea_id: analysis.idea_id,
            analysis_id: analysis.id,
            status: analysis.status,
        }),
    ))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<AnalysisResultResponse>> {
    let analysis = services::analysis::get(&state, &user, id).await?;
    Ok(Json(analysis.into()))
}
