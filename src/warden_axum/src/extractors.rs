use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use warden_application::AuthOrchestrator;
use warden_core::{AccessClaims, AccountStore, RefreshTokenStore, Role};

use crate::error::AuthApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, taken from a verified `Authorization: Bearer`
/// access token. Handlers receive it as an argument; nothing downstream reads
/// ambient request state.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AccessClaims);

impl AuthenticatedUser {
    pub fn account_id(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.0
    }
}

impl<A, R> FromRequestParts<AuthOrchestrator<A, R>> for AuthenticatedUser
where
    A: AccountStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    type Rejection = AuthApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        auth: &AuthOrchestrator<A, R>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthApiError::MissingToken)?;

        let claims = auth.verify_access_token(token).map_err(|e| {
            tracing::debug!("Rejected access token");
            AuthApiError::from(e)
        })?;

        Ok(AuthenticatedUser(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}
