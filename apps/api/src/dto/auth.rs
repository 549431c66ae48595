use serde::{Deserialize, Serialize};

/// Credentials exchanged for a token pair.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Access and refresh tokens for one login.
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Refresh token exchanged for a new access token.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

/// Freshly issued access token.
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}
