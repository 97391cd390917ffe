use secrecy::Secret;
use warden_core::{RefreshSecret, RefreshTokenStore, RefreshTokenStoreError};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
}

/// Logout use case - ends a session by revoking its token family
pub struct LogoutUseCase<'a, R>
where
    R: RefreshTokenStore,
{
    token_store: &'a R,
}

impl<'a, R> LogoutUseCase<'a, R>
where
    R: RefreshTokenStore,
{
    pub fn new(token_store: &'a R) -> Self {
        Self { token_store }
    }

    /// Execute the logout use case
    ///
    /// Unknown and already revoked tokens succeed too, so the endpoint does
    /// not reveal token state.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: Secret<String>) -> Result<(), LogoutError> {
        let presented = RefreshSecret::from(refresh_token);

        if let Some(token) = self
            .token_store
            .find_by_token_hash(&presented.digest())
            .await?
        {
            let revoked = self.token_store.revoke_family(token.id).await?;
            tracing::info!(account_id = %token.account_id, revoked, "Session logged out");
        }

        Ok(())
    }
}
