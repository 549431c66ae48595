use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use stockroom_core::AppError;

use crate::auth::TokenType;
use crate::error::ApiResult;
use crate::state::AppState;

/// Turns a valid `Authorization: Bearer` access token into a `Caller` extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let caller = state
        .token_issuer
        .verify(token, TokenType::Access)?
        .caller();

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
