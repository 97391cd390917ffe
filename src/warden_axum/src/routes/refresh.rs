use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use warden_application::{AuthOrchestrator, RefreshOutcome};
use warden_core::{AccountStore, RefreshTokenStore};

use crate::{
    dto::{RefreshTokenRequest, TokenResponse},
    error::AuthApiError,
};

/// Reuse is answered exactly like an unknown token; the family revocation
/// has already happened inside the orchestrator.
#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<A, R>(
    State(auth): State<AuthOrchestrator<A, R>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AccountStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let Json(request) = payload?;

    match auth.refresh(request.refresh_token).await? {
        RefreshOutcome::Success(pair) => Ok(Json(TokenResponse::from(pair))),
        RefreshOutcome::InvalidRefreshToken | RefreshOutcome::ReuseDetected => {
            Err(AuthApiError::InvalidRefreshToken)
        }
    }
}
