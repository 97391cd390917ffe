use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_application::{LoginError, LogoutError, RefreshError, RegisterError};
use warden_core::{EmailError, InvalidToken, PasswordError, PolicyViolation};

/// Field name -> what is wrong with it.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input")]
    InvalidInput(FieldErrors),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked")]
    AccountLocked { until: DateTime<Utc> },

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl AuthApiError {
    pub fn invalid_field(field: &str, message: impl ToString) -> Self {
        AuthApiError::InvalidInput(FieldErrors::from([(field.to_string(), message.to_string())]))
    }

    pub fn weak_password(violations: &[PolicyViolation]) -> Self {
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::invalid_field("password", message)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthApiError::EmailTaken => StatusCode::CONFLICT,
            AuthApiError::InvalidCredentials
            | AuthApiError::InvalidRefreshToken
            | AuthApiError::MissingToken
            | AuthApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthApiError::AccountLocked { .. } => StatusCode::LOCKED,
            AuthApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match self {
            AuthApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    fields: None,
                    locked_until: None,
                }
            }
            AuthApiError::InvalidInput(fields) => ErrorResponse {
                error: "Invalid input".to_string(),
                fields: Some(fields),
                locked_until: None,
            },
            AuthApiError::AccountLocked { until } => ErrorResponse {
                error: "Account locked".to_string(),
                fields: None,
                locked_until: Some(until),
            },
            other => ErrorResponse {
                error: other.to_string(),
                fields: None,
                locked_until: None,
            },
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AuthApiError {
    fn from(rejection: JsonRejection) -> Self {
        AuthApiError::invalid_field("body", rejection.body_text())
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::invalid_field("email", error)
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        AuthApiError::invalid_field("password", error)
    }
}

impl From<InvalidToken> for AuthApiError {
    fn from(_: InvalidToken) -> Self {
        AuthApiError::InvalidToken
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<RefreshError> for AuthApiError {
    fn from(error: RefreshError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<RegisterError> for AuthApiError {
    fn from(error: RegisterError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}
