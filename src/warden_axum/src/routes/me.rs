use axum::Json;
use warden_core::AccessClaims;

use crate::extractors::AuthenticatedUser;

#[tracing::instrument(name = "Me", skip_all, fields(account_id = %user.account_id()))]
pub async fn me(user: AuthenticatedUser) -> Json<AccessClaims> {
    Json(user.0)
}
