//! Authentication routes

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::models::{
    LoginRequest, RefreshRequest, RegisterRequest, SuccessResponse, TokenResponse, UserResponse,
};
use crate::services;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let (user, tokens) = services::auth::register(
        &state,
        &payload.email,
        &payload.password,
        payload.name.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse::new(tokens, Some(&user)))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let (user, tokens) = services::auth::login(&state, &payload.email, &payload.password).await?;
    Ok(Json(TokenResponse::new(tokens, Some(&user))))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = services::auth::refresh(&state, &payload.refresh_token).await?;
    Ok(Json(TokenResponse::new(tokens, None)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<SuccessResponse>> {
    services::auth::delete_account(&state, &user).await?;
    Ok(Json(SuccessResponse::new("Account deleted")))
}
