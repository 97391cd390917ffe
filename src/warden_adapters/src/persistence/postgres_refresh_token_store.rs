use sqlx::{Pool, Postgres, Row, postgres::PgRow};
use uuid::Uuid;
use warden_core::{
    FamilyWalk, RefreshToken, RefreshTokenId, RefreshTokenStore, RefreshTokenStoreError,
    RotationOutcome,
};

#[derive(Clone)]
pub struct PostgresRefreshTokenStore {
    pool: sqlx::PgPool,
    family_limit: usize,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresRefreshTokenStore {
            pool,
            family_limit: FamilyWalk::DEFAULT_LIMIT,
        }
    }

    pub fn with_family_limit(mut self, limit: usize) -> Self {
        self.family_limit = limit;
        self
    }
}

const SELECT_TOKEN: &str = r#"
    SELECT id, account_id, token_hash, parent_id, expires_at, created_at, used, revoked
    FROM refresh_tokens
"#;

const INSERT_TOKEN: &str = r#"
    INSERT INTO refresh_tokens
        (id, account_id, token_hash, parent_id, expires_at, created_at, used, revoked)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

fn unexpected(e: impl ToString) -> RefreshTokenStoreError {
    RefreshTokenStoreError::UnexpectedError(e.to_string())
}

fn insert_error(e: sqlx::Error) -> RefreshTokenStoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return RefreshTokenStoreError::TokenAlreadyExists;
    }
    unexpected(e)
}

fn token_from_row(row: &PgRow) -> Result<RefreshToken, RefreshTokenStoreError> {
    Ok(RefreshToken {
        id: row.try_get("id").map_err(unexpected)?,
        account_id: row.try_get("account_id").map_err(unexpected)?,
        token_hash: row.try_get("token_hash").map_err(unexpected)?,
        parent_id: row.try_get("parent_id").map_err(unexpected)?,
        expires_at: row.try_get("expires_at").map_err(unexpected)?,
        created_at: row.try_get("created_at").map_err(unexpected)?,
        used: row.try_get("used").map_err(unexpected)?,
        revoked: row.try_get("revoked").map_err(unexpected)?,
    })
}

fn insert_query(token: &RefreshToken) -> sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(INSERT_TOKEN)
        .bind(token.id)
        .bind(token.account_id)
        .bind(&token.token_hash)
        .bind(token.parent_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.used)
        .bind(token.revoked)
}

#[async_trait::async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    #[tracing::instrument(name = "Adding refresh token to PostgreSQL", skip_all)]
    async fn add_token(&self, token: RefreshToken) -> Result<(), RefreshTokenStoreError> {
        insert_query(&token)
            .execute(&self.pool)
            .await
            .map_err(insert_error)?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving refresh token from PostgreSQL", skip_all)]
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenStoreError> {
        let row = sqlx::query(&format!("{SELECT_TOKEN} WHERE token_hash = $1"))
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref().map(token_from_row).transpose()
    }

    #[tracing::instrument(name = "Retrieving child refresh tokens from PostgreSQL", skip(self))]
    async fn find_children(
        &self,
        parent_id: RefreshTokenId,
    ) -> Result<Vec<RefreshToken>, RefreshTokenStoreError> {
        let rows = sqlx::query(&format!("{SELECT_TOKEN} WHERE parent_id = $1 ORDER BY created_at"))
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.iter().map(token_from_row).collect()
    }

    /// Locks the presented row, flips `used` only if it is still unused and
    /// unrevoked, and inserts the replacement in the same transaction.
    #[tracing::instrument(name = "Rotating refresh token in PostgreSQL", skip(self, replacement))]
    async fn rotate(
        &self,
        presented: RefreshTokenId,
        replacement: RefreshToken,
    ) -> Result<RotationOutcome, RefreshTokenStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let row = sqlx::query("SELECT used, revoked FROM refresh_tokens WHERE id = $1 FOR UPDATE")
            .bind(presented)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            return Ok(RotationOutcome::NotFound);
        };
        let used: bool = row.try_get("used").map_err(unexpected)?;
        let revoked: bool = row.try_get("revoked").map_err(unexpected)?;
        if revoked {
            return Ok(RotationOutcome::Revoked);
        }
        if used {
            return Ok(RotationOutcome::AlreadyUsed);
        }

        let updated = sqlx::query(
            "UPDATE refresh_tokens SET used = TRUE WHERE id = $1 AND used = FALSE AND revoked = FALSE",
        )
        .bind(presented)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if updated.rows_affected() != 1 {
            return Ok(RotationOutcome::AlreadyUsed);
        }

        insert_query(&replacement)
            .execute(&mut *tx)
            .await
            .map_err(insert_error)?;

        tx.commit().await.map_err(unexpected)?;

        Ok(RotationOutcome::Rotated)
    }

    /// Walks the family breadth-first inside one transaction, locking every
    /// row before reading its children. A rotation racing the walk either
    /// commits first, and its child is seen, or blocks until the walk commits
    /// and then finds its parent revoked.
    #[tracing::instrument(name = "Revoking token family in PostgreSQL", skip(self))]
    async fn revoke_family(&self, root: RefreshTokenId) -> Result<usize, RefreshTokenStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let root_row = sqlx::query("SELECT id FROM refresh_tokens WHERE id = $1 FOR UPDATE")
            .bind(root)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;
        if root_row.is_none() {
            return Ok(0);
        }

        let mut walk = FamilyWalk::new(root, self.family_limit);
        let mut family = Vec::new();
        while let Some(id) = walk.next_id() {
            family.push(id);
            let children: Vec<Uuid> = sqlx::query_scalar(
                "SELECT id FROM refresh_tokens WHERE parent_id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(unexpected)?;
            // Dropping the transaction on error rolls everything back.
            walk.push_children(children)?;
        }

        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE id = ANY($1) AND revoked = FALSE",
        )
        .bind(&family)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;

        Ok(result.rows_affected() as usize)
    }
}
