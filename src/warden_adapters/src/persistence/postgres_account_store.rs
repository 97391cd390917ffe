use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::{Pool, Postgres, Row, postgres::PgRow};
use warden_core::{
    Account, AccountId, AccountStore, AccountStoreError, Email, FailedLogin, LockoutPolicy,
    PasswordHashString, Role,
};

#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: sqlx::PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresAccountStore { pool }
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, email, password_hash, role, failed_login_attempts, lockout_until, created_at
    FROM accounts
"#;

fn unexpected(e: impl ToString) -> AccountStoreError {
    AccountStoreError::UnexpectedError(e.to_string())
}

fn account_from_row(row: &PgRow) -> Result<Account, AccountStoreError> {
    let id: AccountId = row.try_get("id").map_err(unexpected)?;
    let email: String = row.try_get("email").map_err(unexpected)?;
    let password_hash: String = row.try_get("password_hash").map_err(unexpected)?;
    let role: String = row.try_get("role").map_err(unexpected)?;
    let failed_login_attempts: i32 = row.try_get("failed_login_attempts").map_err(unexpected)?;
    let lockout_until: Option<DateTime<Utc>> = row.try_get("lockout_until").map_err(unexpected)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(unexpected)?;

    Ok(Account::restore(
        id,
        Email::from_trusted(email),
        PasswordHashString::new(password_hash),
        role.parse::<Role>().map_err(unexpected)?,
        u32::try_from(failed_login_attempts).map_err(unexpected)?,
        lockout_until,
        created_at,
    ))
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn add_account(&self, account: Account) -> Result<(), AccountStoreError> {
        let query = sqlx::query(
            r#"
                INSERT INTO accounts
                    (id, email, password_hash, role, failed_login_attempts, lockout_until, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id())
        .bind(account.email().as_str())
        .bind(account.password_hash().as_ref().expose_secret())
        .bind(account.role().as_str())
        .bind(i32::try_from(account.failed_login_attempts()).map_err(unexpected)?)
        .bind(account.lockout_until())
        .bind(account.created_at());

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_unique_violation()
            {
                return AccountStoreError::AccountAlreadyExists;
            }
            unexpected(e)
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip(self))]
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref().map(account_from_row).transpose()
    }

    /// Locks the account row for the read-modify-write, so concurrent wrong
    /// guesses queue behind each other instead of writing the same count.
    #[tracing::instrument(name = "Recording failed login in PostgreSQL", skip(self, policy))]
    async fn record_failed_login(
        &self,
        id: AccountId,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> Result<FailedLogin, AccountStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?
            .ok_or(AccountStoreError::AccountNotFound)?;
        let mut account = account_from_row(&row)?;

        account.clear_lapsed_lockout(now);
        let outcome = account.record_failed_login(now, policy);

        sqlx::query(
            r#"
                UPDATE accounts
                SET failed_login_attempts = $1, lockout_until = $2
                WHERE id = $3
            "#,
        )
        .bind(i32::try_from(account.failed_login_attempts()).map_err(unexpected)?)
        .bind(account.lockout_until())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;

        Ok(outcome)
    }

    #[tracing::instrument(name = "Resetting account lockout in PostgreSQL", skip(self))]
    async fn reset_lockout(&self, id: AccountId) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET failed_login_attempts = 0, lockout_until = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }
}
