use crate::domain::refresh_token::RefreshSecret;

/// What a successful login, registration or refresh hands back.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: RefreshSecret,
    pub expires_in_seconds: i64,
}

impl TokenPair {
    pub const TOKEN_TYPE: &'static str = "Bearer";

    pub fn token_type(&self) -> &'static str {
        Self::TOKEN_TYPE
    }
}
