use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use warden_application::AuthOrchestrator;
use warden_core::{AccountStore, RefreshTokenStore};

use crate::{dto::RefreshTokenRequest, error::AuthApiError};

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<A, R>(
    State(auth): State<AuthOrchestrator<A, R>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<StatusCode, AuthApiError>
where
    A: AccountStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let Json(request) = payload?;
    auth.logout(request.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
