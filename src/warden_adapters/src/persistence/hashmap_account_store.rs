use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use chrono::{DateTime, Utc};
use warden_core::{
    Account, AccountId, AccountStore, AccountStoreError, Email, FailedLogin, LockoutPolicy,
};

#[derive(Default, Clone)]
struct Accounts {
    by_id: HashMap<AccountId, Account>,
    id_by_email: HashMap<Email, AccountId>,
}

#[derive(Default, Clone)]
pub struct HashMapAccountStore {
    accounts: Arc<RwLock<Accounts>>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for HashMapAccountStore {
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.id_by_email.contains_key(account.email()) {
            return Err(AccountStoreError::AccountAlreadyExists);
        }
        accounts
            .id_by_email
            .insert(account.email().clone(), account.id());
        accounts.by_id.insert(account.id(), account);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .id_by_email
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(&id).cloned())
    }

    async fn record_failed_login(
        &self,
        id: AccountId,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> Result<FailedLogin, AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.clear_lapsed_lockout(now);
        Ok(account.record_failed_login(now, policy))
    }

    async fn reset_lockout(&self, id: AccountId) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.reset_lockout();
        Ok(())
    }
}
