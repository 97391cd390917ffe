use secrecy::Secret;
use warden_core::{
    AccountStore, AccountStoreError, Clock, RefreshSecret, RefreshToken, RefreshTokenStore,
    RefreshTokenStoreError, RotationOutcome, TokenPair, TokenSigner, TokenSignerError,
};

use crate::use_cases::issuance::mint_token_pair;

/// Response from refresh use case
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The presented token was consumed and replaced by a child
    Success(TokenPair),
    /// Unknown, expired or revoked token
    InvalidRefreshToken,
    /// An already redeemed token was replayed and its family is now revoked
    ReuseDetected,
}

/// Error types specific to refresh use case
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
    #[error("Token signer error: {0}")]
    TokenSignerError(#[from] TokenSignerError),
}

/// Refresh use case - rotates a refresh token and detects replays
pub struct RefreshUseCase<'a, A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    account_store: &'a A,
    token_store: &'a R,
    signer: &'a dyn TokenSigner,
    clock: &'a dyn Clock,
}

impl<'a, A, R> RefreshUseCase<'a, A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    pub fn new(
        account_store: &'a A,
        token_store: &'a R,
        signer: &'a dyn TokenSigner,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            account_store,
            token_store,
            signer,
            clock,
        }
    }

    /// Execute the refresh use case
    ///
    /// # Arguments
    /// * `refresh_token` - The opaque refresh secret presented by the client
    ///
    /// # Returns
    /// RefreshOutcome; every failure variant maps to the same external message
    #[tracing::instrument(name = "RefreshUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        refresh_token: Secret<String>,
    ) -> Result<RefreshOutcome, RefreshError> {
        let now = self.clock.now();
        let presented = RefreshSecret::from(refresh_token);

        let Some(token) = self
            .token_store
            .find_by_token_hash(&presented.digest())
            .await?
        else {
            tracing::debug!("Refresh token not found");
            return Ok(RefreshOutcome::InvalidRefreshToken);
        };

        if token.revoked || token.is_expired(now) {
            tracing::debug!(token_id = %token.id, "Refresh token expired or revoked");
            return Ok(RefreshOutcome::InvalidRefreshToken);
        }

        if token.used {
            return self.handle_reuse(&token).await;
        }

        let Some(account) = self.account_store.find_by_id(token.account_id).await? else {
            tracing::warn!(token_id = %token.id, "Refresh token owner no longer exists");
            return Ok(RefreshOutcome::InvalidRefreshToken);
        };

        let (pair, replacement) = mint_token_pair(self.signer, &account, Some(token.id), now)?;

        match self.token_store.rotate(token.id, replacement).await? {
            RotationOutcome::Rotated => {
                tracing::info!(account_id = %account.id(), parent_id = %token.id, "Refresh token rotated");
                Ok(RefreshOutcome::Success(pair))
            }
            // A concurrent redemption consumed the token between our read and
            // the conditional update.
            RotationOutcome::AlreadyUsed => self.handle_reuse(&token).await,
            RotationOutcome::Revoked | RotationOutcome::NotFound => {
                Ok(RefreshOutcome::InvalidRefreshToken)
            }
        }
    }

    async fn handle_reuse(&self, token: &RefreshToken) -> Result<RefreshOutcome, RefreshError> {
        let revoked = self.token_store.revoke_family(token.id).await?;

        tracing::error!(
            target: "security",
            account_id = %token.account_id,
            token_id = %token.id,
            revoked,
            "Refresh token reuse detected, token family revoked"
        );

        Ok(RefreshOutcome::ReuseDetected)
    }
}
