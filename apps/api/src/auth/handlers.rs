use axum::Json;
use axum::extract::State;
use stockroom_core::AppError;
use stockroom_domain::AuditAction;
use tracing::info;

use super::TokenType;
use crate::dto::{AccessTokenResponse, RefreshTokenRequest, TokenPairResponse, TokenRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn token_handler(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let caller = state
        .account_service
        .authenticate(payload.username.as_str(), payload.password.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("no active account found with the given credentials".to_owned())
        })?;

    let access = state.token_issuer.issue(&caller, TokenType::Access)?;
    let refresh = state.token_issuer.issue(&caller, TokenType::Refresh)?;

    info!(
        action = AuditAction::TokenIssued.as_str(),
        subject = caller.subject(),
        "issued token pair"
    );

    Ok(Json(TokenPairResponse { access, refresh }))
}

/// Issues a new access token, re-reading the account so role changes apply.
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let claims = state
        .token_issuer
        .verify(payload.refresh.as_str(), TokenType::Refresh)?;

    let caller = state
        .account_service
        .caller_for(claims.sub.as_str())
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    let access = state.token_issuer.issue(&caller, TokenType::Access)?;
    Ok(Json(AccessTokenResponse { access }))
}
