use secrecy::{ExposeSecret, Secret};
use warden_core::{
    Account, AccountStore, AccountStoreError, Clock, CredentialError, CredentialVerifier, Email,
    Password, PasswordPolicy, PolicyViolation, RefreshTokenStore, RefreshTokenStoreError, Role,
    TokenPair, TokenSigner, TokenSignerError,
};

use crate::use_cases::issuance::mint_token_pair;

/// Response from register use case
#[derive(Debug)]
pub enum RegisterOutcome {
    /// Account created and logged in
    Success(TokenPair),
    EmailTaken,
    /// Every strength rule the chosen password breaks
    WeakPassword(Vec<PolicyViolation>),
    ConfirmationMismatch,
}

/// Error types specific to register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
    #[error("Credential error: {0}")]
    CredentialError(#[from] CredentialError),
    #[error("Token signer error: {0}")]
    TokenSignerError(#[from] TokenSignerError),
}

/// Register use case - creates a standard account and logs it in
pub struct RegisterUseCase<'a, A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    account_store: &'a A,
    token_store: &'a R,
    verifier: &'a dyn CredentialVerifier,
    signer: &'a dyn TokenSigner,
    clock: &'a dyn Clock,
    password_policy: &'a PasswordPolicy,
}

impl<'a, A, R> RegisterUseCase<'a, A, R>
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
        password_policy: &'a PasswordPolicy,
    ) -> Self {
        Self {
            account_store,
            token_store,
            verifier,
            signer,
            clock,
            password_policy,
        }
    }

    /// Execute the register use case
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Chosen password
    /// * `confirm_password` - Must equal `password`
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, password, confirm_password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        confirm_password: Secret<String>,
    ) -> Result<RegisterOutcome, RegisterError> {
        let violations = self.password_policy.check(&password);
        if !violations.is_empty() {
            return Ok(RegisterOutcome::WeakPassword(violations));
        }

        if password.as_ref().expose_secret() != confirm_password.expose_secret() {
            return Ok(RegisterOutcome::ConfirmationMismatch);
        }

        if self.account_store.find_by_email(&email).await?.is_some() {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let now = self.clock.now();
        let password_hash = self.verifier.hash(&password).await?;
        let account = Account::new(email, password_hash, Role::default(), now);

        match self.account_store.add_account(account.clone()).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same email.
            Err(AccountStoreError::AccountAlreadyExists) => {
                return Ok(RegisterOutcome::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        }

        let (pair, record) = mint_token_pair(self.signer, &account, None, now)?;
        self.token_store.add_token(record).await?;
        tracing::info!(account_id = %account.id(), "Account registered");

        Ok(RegisterOutcome::Success(pair))
    }
}
