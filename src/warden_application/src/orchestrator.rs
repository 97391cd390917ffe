use std::sync::Arc;

use secrecy::Secret;
use warden_core::{
    AccessClaims, AccountStore, Clock, CredentialVerifier, Email, InvalidToken, LockoutPolicy,
    Password, PasswordPolicy, RefreshTokenStore, TokenSigner,
};

use crate::use_cases::{
    login::{LoginError, LoginOutcome, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    refresh::{RefreshError, RefreshOutcome, RefreshUseCase},
    register::{RegisterError, RegisterOutcome, RegisterUseCase},
    verify::VerifyAccessTokenUseCase,
};

/// Ties the stores, the credential verifier, the token signer and the clock
/// together behind the login, refresh, register and logout flows.
///
/// Cheap to clone: stores are handles to shared state and everything else
/// sits behind an `Arc`, so one instance can serve as router state.
pub struct AuthOrchestrator<A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    account_store: A,
    token_store: R,
    verifier: Arc<dyn CredentialVerifier>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    lockout_policy: LockoutPolicy,
    password_policy: Arc<PasswordPolicy>,
}

impl<A, R> Clone for AuthOrchestrator<A, R>
where
    A: AccountStore + Clone,
    R: RefreshTokenStore + Clone,
{
    fn clone(&self) -> Self {
        Self {
            account_store: self.account_store.clone(),
            token_store: self.token_store.clone(),
            verifier: Arc::clone(&self.verifier),
            signer: Arc::clone(&self.signer),
            clock: Arc::clone(&self.clock),
            lockout_policy: self.lockout_policy,
            password_policy: Arc::clone(&self.password_policy),
        }
    }
}

impl<A, R> AuthOrchestrator<A, R>
where
    A: AccountStore,
    R: RefreshTokenStore,
{
    pub fn new(
        account_store: A,
        token_store: R,
        verifier: Arc<dyn CredentialVerifier>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            account_store,
            token_store,
            verifier,
            signer,
            clock,
            lockout_policy: LockoutPolicy::default(),
            password_policy: Arc::new(PasswordPolicy::default()),
        }
    }

    pub fn with_lockout_policy(mut self, policy: LockoutPolicy) -> Self {
        self.lockout_policy = policy;
        self
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = Arc::new(policy);
        self
    }

    pub fn account_store(&self) -> &A {
        &self.account_store
    }

    pub fn token_store(&self) -> &R {
        &self.token_store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub async fn login(
        &self,
        email: Email,
        password: Password,
    ) -> Result<LoginOutcome, LoginError> {
        LoginUseCase::new(
            &self.account_store,
            &self.token_store,
            self.verifier.as_ref(),
            self.signer.as_ref(),
            self.clock.as_ref(),
            self.lockout_policy,
        )
        .execute(email, password)
        .await
    }

    pub async fn refresh(
        &self,
        refresh_token: Secret<String>,
    ) -> Result<RefreshOutcome, RefreshError> {
        RefreshUseCase::new(
            &self.account_store,
            &self.token_store,
            self.signer.as_ref(),
            self.clock.as_ref(),
        )
        .execute(refresh_token)
        .await
    }

    pub async fn register(
        &self,
        email: Email,
        password: Password,
        confirm_password: Secret<String>,
    ) -> Result<RegisterOutcome, RegisterError> {
        RegisterUseCase::new(
            &self.account_store,
            &self.token_store,
            self.verifier.as_ref(),
            self.signer.as_ref(),
            self.clock.as_ref(),
            &self.password_policy,
        )
        .execute(email, password, confirm_password)
        .await
    }

    pub async fn logout(&self, refresh_token: Secret<String>) -> Result<(), LogoutError> {
        LogoutUseCase::new(&self.token_store)
            .execute(refresh_token)
            .await
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, InvalidToken> {
        VerifyAccessTokenUseCase::new(self.signer.as_ref(), self.clock.as_ref()).execute(token)
    }
}
