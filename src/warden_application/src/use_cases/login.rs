use chrono::{DateTime, Utc};
use warden_core::{
    Account, AccountStore, AccountStoreError, Clock, CredentialVerifier, Email, FailedLogin,
    LockoutPolicy, Password, RefreshTokenStore, RefreshTokenStoreError, TokenPair, TokenSigner,
    TokenSignerError,
};

use crate::use_cases::issuance::mint_token_pair;

/// Response from login use case
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted, a new token family was started
    Success(TokenPair),
    /// Unknown account or wrong password; the two are indistinguishable
    InvalidCredentials,
    /// The account is locked until the given instant
    AccountLocked { until: DateTime<Utc> },
}

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
    #[error("Token signer error: {0}")]
    TokenSignerError(#[from] TokenSignerError),
}

/// Login use case - checks credentials against the account guard and starts
/// a token family on success
pub struct LoginUseCase<'a, A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    account_store: &'a A,
    token_store: &'a R,
    verifier: &'a dyn CredentialVerifier,
    signer: &'a dyn TokenSigner,
    clock: &'a dyn Clock,
    lockout_policy: LockoutPolicy,
}

impl<'a, A, R> LoginUseCase<'a, A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    pub fn new(
        account_store: &'a A,
        token_store: &'a R,
        verifier: &'a dyn CredentialVerifier,
        signer: &'a dyn TokenSigner,
        clock: &'a dyn Clock,
        lockout_policy: LockoutPolicy,
    ) -> Self {
        Self {
            account_store,
            token_store,
            verifier,
            signer,
            clock,
            lockout_policy,
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `email` - Normalized account identifier
    /// * `password` - Presented secret
    ///
    /// # Returns
    /// LoginOutcome describing which branch of the flow was taken
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<LoginOutcome, LoginError> {
        let now = self.clock.now();

        let Some(account) = self.account_store.find_by_email(&email).await? else {
            // Same cost as a real verification so timing does not reveal
            // whether the email is registered.
            self.verifier.verify_dummy(&password).await;
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if let Some(until) = account.lockout_until().filter(|_| account.is_locked(now)) {
            tracing::info!(account_id = %account.id(), %until, "Login refused, account locked");
            return Ok(LoginOutcome::AccountLocked { until });
        }
        if account.lockout_lapsed(now) {
            tracing::info!(account_id = %account.id(), "Lockout window has lapsed");
        }

        if !self
            .verifier
            .verify(&password, account.password_hash())
            .await
        {
            return self.handle_wrong_password(&account, now).await;
        }

        if account.failed_login_attempts() != 0 || account.lockout_until().is_some() {
            self.account_store.reset_lockout(account.id()).await?;
        }

        let pair = self.start_family(&account, now).await?;
        tracing::info!(account_id = %account.id(), "Login succeeded");

        Ok(LoginOutcome::Success(pair))
    }

    /// The count happens in the store against the current record, not against
    /// the copy read before the hash check.
    async fn handle_wrong_password(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, LoginError> {
        let outcome = self
            .account_store
            .record_failed_login(account.id(), now, &self.lockout_policy)
            .await?;

        match outcome {
            FailedLogin::Counted { attempts } => {
                tracing::info!(account_id = %account.id(), attempts, "Wrong password");
                Ok(LoginOutcome::InvalidCredentials)
            }
            FailedLogin::LockedOut { until } => {
                tracing::warn!(
                    target: "security",
                    account_id = %account.id(),
                    %until,
                    "Account locked after repeated failed logins"
                );
                Ok(LoginOutcome::AccountLocked { until })
            }
        }
    }

    async fn start_family(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, LoginError> {
        let (pair, record) = mint_token_pair(self.signer, account, None, now)?;
        self.token_store.add_token(record).await?;
        Ok(pair)
    }
}
