use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountId, FailedLogin},
    email::Email,
    lockout::LockoutPolicy,
    refresh_token::{FamilyWalkError, RefreshToken, RefreshTokenId, RotationOutcome},
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Account already exists")]
    AccountAlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::AccountAlreadyExists, Self::AccountAlreadyExists)
                | (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError>;
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError>;
    /// Count a wrong-password attempt against the stored account in one
    /// atomic step: a lapsed lockout is cleared first, then the counter is
    /// incremented and the lock set once `policy` is reached. A lock that is
    /// still running is neither extended nor counted against.
    async fn record_failed_login(
        &self,
        id: AccountId,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> Result<FailedLogin, AccountStoreError>;
    /// Clear the failure counter and any lockout of the stored account.
    async fn reset_lockout(&self, id: AccountId) -> Result<(), AccountStoreError>;
}

// RefreshTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum RefreshTokenStoreError {
    #[error("Refresh token already exists")]
    TokenAlreadyExists,
    #[error(transparent)]
    FamilyTooLarge(#[from] FamilyWalkError),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for RefreshTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TokenAlreadyExists, Self::TokenAlreadyExists)
                | (Self::FamilyTooLarge(_), Self::FamilyTooLarge(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn add_token(&self, token: RefreshToken) -> Result<(), RefreshTokenStoreError>;

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenStoreError>;

    async fn find_children(
        &self,
        parent_id: RefreshTokenId,
    ) -> Result<Vec<RefreshToken>, RefreshTokenStoreError>;

    /// Atomically mark `presented` as used and store `replacement`, provided
    /// `presented` is still unused and unrevoked. Two concurrent calls for
    /// the same token get exactly one `Rotated`.
    async fn rotate(
        &self,
        presented: RefreshTokenId,
        replacement: RefreshToken,
    ) -> Result<RotationOutcome, RefreshTokenStoreError>;

    /// Revoke `root` and every descendant in one atomic step. Already revoked
    /// tokens are left as they are; returns how many tokens changed.
    async fn revoke_family(&self, root: RefreshTokenId) -> Result<usize, RefreshTokenStoreError>;
}
