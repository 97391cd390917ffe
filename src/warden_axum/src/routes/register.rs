use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use warden_application::{AuthOrchestrator, RegisterOutcome};
use warden_core::{AccountStore, Email, Password, RefreshTokenStore};

use crate::{
    dto::{RegisterRequest, TokenResponse},
    error::{AuthApiError, FieldErrors},
};

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<A, R>(
    State(auth): State<AuthOrchestrator<A, R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AccountStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let Json(request) = payload?;

    // Report every malformed field at once rather than the first one.
    let mut fields = FieldErrors::new();
    let email = Email::try_from(request.email)
        .map_err(|e| fields.insert("email".to_string(), e.to_string()))
        .ok();
    let password = Password::try_from(request.password)
        .map_err(|e| fields.insert("password".to_string(), e.to_string()))
        .ok();
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AuthApiError::InvalidInput(fields));
    };

    match auth
        .register(email, password, request.confirm_password)
        .await?
    {
        RegisterOutcome::Success(pair) => {
            Ok((StatusCode::CREATED, Json(TokenResponse::from(pair))))
        }
        RegisterOutcome::EmailTaken => Err(AuthApiError::EmailTaken),
        RegisterOutcome::WeakPassword(violations) => {
            Err(AuthApiError::weak_password(&violations))
        }
        RegisterOutcome::ConfirmationMismatch => Err(AuthApiError::invalid_field(
            "confirm_password",
            "does not match password",
        )),
    }
}
