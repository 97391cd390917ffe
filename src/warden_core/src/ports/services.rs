use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    access_token::{AccessClaims, IssuedAccessToken},
    account::Account,
    password::{Password, PasswordHashString},
    refresh_token::RefreshSecret,
};

// ============================================================================
// Clock
// ============================================================================

/// Source of the current instant. Every expiry and lockout decision reads
/// time through this port so tests can move it by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// ============================================================================
// Credential Verifier
// ============================================================================

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Slow, salted password hashing.
///
/// `verify` never errors: a malformed stored hash simply does not match.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHashString, CredentialError>;

    async fn verify(&self, password: &Password, hash: &PasswordHashString) -> bool;

    /// Spend the same work as a real `verify` and discard the result. Used
    /// when the account does not exist, so response timing does not tell
    /// callers which emails are registered.
    async fn verify_dummy(&self, password: &Password);
}

// ============================================================================
// Token Signer
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenSignerError {
    #[error("Signing secret must be at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },
    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

/// The single outcome for every rejected access token: bad signature,
/// expired, wrong issuer or audience, or garbage input. Callers never learn
/// which check failed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Invalid token")]
pub struct InvalidToken;

pub trait TokenSigner: Send + Sync {
    fn issue_access_token(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, TokenSignerError>;

    /// A fresh high-entropy opaque refresh credential.
    fn issue_refresh_secret(&self) -> RefreshSecret;

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, InvalidToken>;

    fn access_token_lifetime(&self) -> Duration;

    fn refresh_token_lifetime(&self) -> Duration;
}
