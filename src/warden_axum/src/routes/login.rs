use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use warden_application::{AuthOrchestrator, LoginOutcome};
use warden_core::{AccountStore, Email, Password, RefreshTokenStore};

use crate::{
    dto::{LoginRequest, TokenResponse},
    error::AuthApiError,
};

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<A, R>(
    State(auth): State<AuthOrchestrator<A, R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AccountStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let Json(request) = payload?;
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    match auth.login(email, password).await? {
        LoginOutcome::Success(pair) => Ok(Json(TokenResponse::from(pair))),
        LoginOutcome::InvalidCredentials => Err(AuthApiError::InvalidCredentials),
        LoginOutcome::AccountLocked { until } => Err(AuthApiError::AccountLocked { until }),
    }
}
