use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use warden_core::TokenPair;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub confirm_password: Secret<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

/// Body of both `/refresh` and `/logout`.
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token_type: pair.token_type().to_string(),
            refresh_token: pair.refresh_token.as_ref().expose_secret().clone(),
            access_token: pair.access_token,
            expires_in: pair.expires_in_seconds,
        }
    }
}
