use axum::Json;
use warden_core::AccessClaims;

use crate::extractors::AuthenticatedUser;

/// For other services holding a bearer token: a 200 with the claims means the
/// token is currently valid, anything else means it is not.
#[tracing::instrument(name = "Verify Token", skip_all)]
pub async fn verify_token(user: AuthenticatedUser) -> Json<AccessClaims> {
    Json(user.0)
}
