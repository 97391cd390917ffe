use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use warden_core::{
    FamilyWalk, RefreshToken, RefreshTokenId, RefreshTokenStore, RefreshTokenStoreError,
    RotationOutcome,
};

/// Token arena indexed by id, with secondary indexes for hash lookup and
/// parent -> children links. One write lock covers every mutation, which is
/// what makes `rotate` and `revoke_family` atomic.
#[derive(Default)]
struct Arena {
    tokens: HashMap<RefreshTokenId, RefreshToken>,
    by_hash: HashMap<String, RefreshTokenId>,
    children: HashMap<RefreshTokenId, Vec<RefreshTokenId>>,
}

impl Arena {
    fn insert(&mut self, token: RefreshToken) -> Result<(), RefreshTokenStoreError> {
        if self.tokens.contains_key(&token.id) || self.by_hash.contains_key(&token.token_hash) {
            return Err(RefreshTokenStoreError::TokenAlreadyExists);
        }
        if let Some(parent) = token.parent_id {
            self.children.entry(parent).or_default().push(token.id);
        }
        self.by_hash.insert(token.token_hash.clone(), token.id);
        self.tokens.insert(token.id, token);
        Ok(())
    }

    fn children_of(&self, id: RefreshTokenId) -> Vec<RefreshTokenId> {
        self.children.get(&id).cloned().unwrap_or_default()
    }
}

#[derive(Default, Clone)]
pub struct HashMapRefreshTokenStore {
    arena: Arc<RwLock<Arena>>,
    family_limit: Option<usize>,
}

impl HashMapRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on how many tokens one `revoke_family` call may touch.
    pub fn with_family_limit(mut self, limit: usize) -> Self {
        self.family_limit = Some(limit);
        self
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for HashMapRefreshTokenStore {
    async fn add_token(&self, token: RefreshToken) -> Result<(), RefreshTokenStoreError> {
        self.arena.write().await.insert(token)
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenStoreError> {
        let arena = self.arena.read().await;
        Ok(arena
            .by_hash
            .get(token_hash)
            .and_then(|id| arena.tokens.get(id))
            .cloned())
    }

    async fn find_children(
        &self,
        parent_id: RefreshTokenId,
    ) -> Result<Vec<RefreshToken>, RefreshTokenStoreError> {
        let arena = self.arena.read().await;
        Ok(arena
            .children_of(parent_id)
            .iter()
            .filter_map(|id| arena.tokens.get(id))
            .cloned()
            .collect())
    }

    #[tracing::instrument(name = "Rotating refresh token in memory", skip(self, replacement))]
    async fn rotate(
        &self,
        presented: RefreshTokenId,
        replacement: RefreshToken,
    ) -> Result<RotationOutcome, RefreshTokenStoreError> {
        let mut arena = self.arena.write().await;

        let Some(parent) = arena.tokens.get(&presented) else {
            return Ok(RotationOutcome::NotFound);
        };
        if parent.revoked {
            return Ok(RotationOutcome::Revoked);
        }
        if parent.used {
            return Ok(RotationOutcome::AlreadyUsed);
        }

        // Insert first so a failed insert leaves the parent untouched.
        arena.insert(replacement)?;
        if let Some(parent) = arena.tokens.get_mut(&presented) {
            parent.used = true;
        }

        Ok(RotationOutcome::Rotated)
    }

    #[tracing::instrument(name = "Revoking token family in memory", skip(self))]
    async fn revoke_family(&self, root: RefreshTokenId) -> Result<usize, RefreshTokenStoreError> {
        let mut arena = self.arena.write().await;
        let limit = self.family_limit.unwrap_or(FamilyWalk::DEFAULT_LIMIT);

        // Collect the whole family before touching anything, so an oversized
        // family leaves no partial revocation behind.
        let mut walk = FamilyWalk::new(root, limit);
        let mut family = Vec::new();
        while let Some(id) = walk.next_id() {
            family.push(id);
            walk.push_children(arena.children_of(id))?;
        }

        let mut revoked = 0;
        for id in family {
            if let Some(token) = arena.tokens.get_mut(&id)
                && !token.revoked
            {
                token.revoked = true;
                revoked += 1;
            }
        }

        Ok(revoked)
    }
}
