//! Hand-written doubles shared by the use case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use uuid::Uuid;
use warden_core::{
    AccessClaims, Account, AccountId, AccountStore, AccountStoreError, Clock, CredentialError,
    CredentialVerifier, Email, FailedLogin, FamilyWalk, InvalidToken, IssuedAccessToken,
    LockoutPolicy, Password, PasswordHashString, RefreshSecret, RefreshToken, RefreshTokenId,
    RefreshTokenStore, RefreshTokenStoreError, Role, RotationOutcome, TokenSigner,
    TokenSignerError,
};

use crate::AuthOrchestrator;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn email(raw: &str) -> Email {
    Email::parse(raw).unwrap()
}

pub fn password(raw: &str) -> Password {
    Password::try_from(Secret::new(raw.to_string())).unwrap()
}

// ============================================================================
// Clock
// ============================================================================

#[derive(Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Credential verifier
// ============================================================================

/// Stores passwords behind a fixed prefix and counts dummy verifications.
#[derive(Clone, Default)]
pub struct PlainVerifier {
    pub dummy_calls: Arc<AtomicUsize>,
}

impl PlainVerifier {
    pub fn hash_of(raw: &str) -> PasswordHashString {
        PasswordHashString::new(format!("plain${raw}"))
    }

    pub fn dummy_count(&self) -> usize {
        self.dummy_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for PlainVerifier {
    async fn hash(&self, password: &Password) -> Result<PasswordHashString, CredentialError> {
        Ok(Self::hash_of(password.as_ref().expose_secret()))
    }

    async fn verify(&self, password: &Password, hash: &PasswordHashString) -> bool {
        // Suspend like a real hash would, so concurrent logins interleave here.
        tokio::task::yield_now().await;
        let expected = Self::hash_of(password.as_ref().expose_secret());
        hash.as_ref().expose_secret() == expected.as_ref().expose_secret()
    }

    async fn verify_dummy(&self, _password: &Password) {
        self.dummy_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Token signer
// ============================================================================

/// Remembers the claims of every token it issued and checks expiry on verify.
#[derive(Clone, Default)]
pub struct FakeSigner {
    issued: Arc<Mutex<HashMap<String, AccessClaims>>>,
}

impl TokenSigner for FakeSigner {
    fn issue_access_token(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, TokenSignerError> {
        let jti = Uuid::new_v4().to_string();
        let expires_at = now + self.access_token_lifetime();
        let claims = AccessClaims {
            sub: account.id().to_string(),
            email: account.email().as_str().to_string(),
            role: account.role(),
            jti: jti.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: "warden-test".to_string(),
            aud: "warden-test".to_string(),
        };
        let token = format!("access.{jti}");
        self.issued.lock().unwrap().insert(token.clone(), claims);

        Ok(IssuedAccessToken {
            token,
            jti,
            expires_at,
            expires_in_seconds: self.access_token_lifetime().num_seconds(),
        })
    }

    fn issue_refresh_secret(&self) -> RefreshSecret {
        RefreshSecret::new(format!("refresh.{}", Uuid::new_v4()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, InvalidToken> {
        let issued = self.issued.lock().unwrap();
        match issued.get(token) {
            Some(claims) if now.timestamp() < claims.exp => Ok(claims.clone()),
            _ => Err(InvalidToken),
        }
    }

    fn access_token_lifetime(&self) -> Duration {
        Duration::minutes(15)
    }

    fn refresh_token_lifetime(&self) -> Duration {
        Duration::days(7)
    }
}

// ============================================================================
// Stores
// ============================================================================

#[derive(Clone, Default)]
pub struct MockAccountStore {
    pub accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl MockAccountStore {
    pub async fn seeded(email_raw: &str, password_raw: &str) -> (Self, Account) {
        let store = Self::default();
        let account = Account::new(
            email(email_raw),
            PlainVerifier::hash_of(password_raw),
            Role::Standard,
            t0(),
        );
        store.add_account(account.clone()).await.unwrap();
        (store, account)
    }

    pub async fn get(&self, id: AccountId) -> Account {
        self.accounts.read().await.get(&id).cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl AccountStore for MockAccountStore {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email() == account.email()) {
            return Err(AccountStoreError::AccountAlreadyExists);
        }
        accounts.insert(account.id(), account);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email() == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn record_failed_login(
        &self,
        id: AccountId,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> Result<FailedLogin, AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.clear_lapsed_lockout(now);
        Ok(account.record_failed_login(now, policy))
    }

    async fn reset_lockout(&self, id: AccountId) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.reset_lockout();
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockTokenStore {
    pub tokens: Arc<RwLock<HashMap<RefreshTokenId, RefreshToken>>>,
}

impl MockTokenStore {
    pub async fn by_secret(&self, secret: &RefreshSecret) -> RefreshToken {
        let digest = secret.digest();
        let tokens = self.tokens.read().await;
        tokens
            .values()
            .find(|t| t.token_hash == digest)
            .cloned()
            .unwrap()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MockTokenStore {
    async fn add_token(&self, token: RefreshToken) -> Result<(), RefreshTokenStoreError> {
        self.tokens.write().await.insert(token.id, token);
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenStoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn find_children(
        &self,
        parent_id: RefreshTokenId,
    ) -> Result<Vec<RefreshToken>, RefreshTokenStoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn rotate(
        &self,
        presented: RefreshTokenId,
        replacement: RefreshToken,
    ) -> Result<RotationOutcome, RefreshTokenStoreError> {
        let mut tokens = self.tokens.write().await;
        let Some(parent) = tokens.get_mut(&presented) else {
            return Ok(RotationOutcome::NotFound);
        };
        if parent.revoked {
            return Ok(RotationOutcome::Revoked);
        }
        if parent.used {
            return Ok(RotationOutcome::AlreadyUsed);
        }
        parent.used = true;
        tokens.insert(replacement.id, replacement);
        Ok(RotationOutcome::Rotated)
    }

    async fn revoke_family(&self, root: RefreshTokenId) -> Result<usize, RefreshTokenStoreError> {
        let mut tokens = self.tokens.write().await;
        let mut walk = FamilyWalk::new(root, FamilyWalk::DEFAULT_LIMIT);
        let mut revoked = 0;
        while let Some(id) = walk.next_id() {
            if let Some(token) = tokens.get_mut(&id)
                && !token.revoked
            {
                token.revoked = true;
                revoked += 1;
            }
            let children: Vec<RefreshTokenId> = tokens
                .values()
                .filter(|t| t.parent_id == Some(id))
                .map(|t| t.id)
                .collect();
            walk.push_children(children)?;
        }
        Ok(revoked)
    }
}

/// Serves lookups from a snapshot taken before any rotation, so the refresh
/// flow sees a token as unused even after a concurrent redemption won.
#[derive(Clone)]
pub struct StaleReadTokenStore {
    pub inner: MockTokenStore,
    pub snapshot: RefreshToken,
}

#[async_trait::async_trait]
impl RefreshTokenStore for StaleReadTokenStore {
    async fn add_token(&self, token: RefreshToken) -> Result<(), RefreshTokenStoreError> {
        self.inner.add_token(token).await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenStoreError> {
        if token_hash == self.snapshot.token_hash {
            return Ok(Some(self.snapshot.clone()));
        }
        self.inner.find_by_token_hash(token_hash).await
    }

    async fn find_children(
        &self,
        parent_id: RefreshTokenId,
    ) -> Result<Vec<RefreshToken>, RefreshTokenStoreError> {
        self.inner.find_children(parent_id).await
    }

    async fn rotate(
        &self,
        presented: RefreshTokenId,
        replacement: RefreshToken,
    ) -> Result<RotationOutcome, RefreshTokenStoreError> {
        self.inner.rotate(presented, replacement).await
    }

    async fn revoke_family(&self, root: RefreshTokenId) -> Result<usize, RefreshTokenStoreError> {
        self.inner.revoke_family(root).await
    }
}

/// Fails every call, standing in for an unreachable database.
#[derive(Clone, Default)]
pub struct FailingAccountStore;

#[async_trait::async_trait]
impl AccountStore for FailingAccountStore {
    async fn add_account(&self, _account: Account) -> Result<(), AccountStoreError> {
        Err(AccountStoreError::UnexpectedError("connection refused".into()))
    }

    async fn find_by_email(&self, _email: &Email) -> Result<Option<Account>, AccountStoreError> {
        Err(AccountStoreError::UnexpectedError("connection refused".into()))
    }

    async fn find_by_id(&self, _id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        Err(AccountStoreError::UnexpectedError("connection refused".into()))
    }

    async fn record_failed_login(
        &self,
        _id: AccountId,
        _now: DateTime<Utc>,
        _policy: &LockoutPolicy,
    ) -> Result<FailedLogin, AccountStoreError> {
        Err(AccountStoreError::UnexpectedError("connection refused".into()))
    }

    async fn reset_lockout(&self, _id: AccountId) -> Result<(), AccountStoreError> {
        Err(AccountStoreError::UnexpectedError("connection refused".into()))
    }
}

// ============================================================================
// Orchestrator fixture
// ============================================================================

pub struct Harness {
    pub auth: AuthOrchestrator<MockAccountStore, MockTokenStore>,
    pub accounts: MockAccountStore,
    pub tokens: MockTokenStore,
    pub verifier: PlainVerifier,
    pub clock: TestClock,
}

impl Harness {
    pub fn new() -> Self {
        let accounts = MockAccountStore::default();
        let tokens = MockTokenStore::default();
        let verifier = PlainVerifier::default();
        let clock = TestClock::at(t0());
        let auth = AuthOrchestrator::new(
            accounts.clone(),
            tokens.clone(),
            Arc::new(verifier.clone()),
            Arc::new(FakeSigner::default()),
            Arc::new(clock.clone()),
        );
        Self {
            auth,
            accounts,
            tokens,
            verifier,
            clock,
        }
    }
}
