//! Registration, login, refresh and account removal

use crate::auth::{burn_verification, hash_password, verify_password, TokenKind, TokenPair};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use biz_core::user::normalize_email;
use biz_core::{Registration, User};
use tracing::info;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> ApiResult<(User, TokenPair)> {
    let registration = Registration::new(email, password, name)?;

    if state.store.user_by_email(&registration.email).await?.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let user = User::new(&registration, hash_password(&registration.password)?);
    // The unique index still catches a concurrent registration.
    state.store.create_user(&user).await?;
    info!(user_id = %user.id, "user registered");

    let tokens = state.tokens.issue_pair(user.id)?;
    Ok((user, tokens))
}

/// Unknown email, wrong password and inactive account are indistinguishable.
pub async fn login(state: &AppState, email: &str, password: &str) -> ApiResult<(User, TokenPair)> {
    let email = normalize_email(email);
    let Some(user) = state.store.user_by_email(&email).await? else {
        burn_verification(password);
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password_hash) || !user.can_sign_in() {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.id, "user logged in");
    let tokens = state.tokens.issue_pair(user.id)?;
    Ok((user, tokens))
}

pub async fn refresh(state: &AppState, refresh_token: &str) -> ApiResult<TokenPair> {
    let claims = state.tokens.verify(refresh_token, TokenKind::Refresh)?;

    let user = state
        .store
        .user_by_id(claims.sub)
        .await?
        .filter(User::can_sign_in)
        .ok_or_else(|| ApiError::Unauthorized("User not found or inactive".to_string()))?;

    state.tokens.issue_pair(user.id)
}

pub async fn delete_account(state: &AppState, user: &User) -> ApiResult<()> {
    if !state.store.soft_delete_user(user.id).await? {
        return Err(ApiError::not_found("User"));
    }
    info!(user_id = %user.id, "user soft-deleted");
    Ok(())
}
