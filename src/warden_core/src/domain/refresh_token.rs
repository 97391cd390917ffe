use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::account::AccountId;

pub type RefreshTokenId = Uuid;

/// The opaque refresh credential handed to clients.
///
/// Only its SHA-256 digest is ever stored, so a leaked token table cannot be
/// replayed.
#[derive(Debug, Clone)]
pub struct RefreshSecret(Secret<String>);

impl RefreshSecret {
    pub fn new(value: String) -> Self {
        Self(Secret::new(value))
    }

    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.expose_secret().as_bytes()))
    }
}

impl From<Secret<String>> for RefreshSecret {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl AsRef<Secret<String>> for RefreshSecret {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Persisted refresh token. Lineage is kept through `parent_id`, which
/// points at the token this one replaced (none for tokens issued at login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub account_id: AccountId,
    pub token_hash: String,
    pub parent_id: Option<RefreshTokenId>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used: bool,
    pub revoked: bool,
}

impl RefreshToken {
    pub fn issue(
        account_id: AccountId,
        secret: &RefreshSecret,
        parent_id: Option<RefreshTokenId>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            token_hash: secret.digest(),
            parent_id,
            expires_at: now + lifetime,
            created_at: now,
            used: false,
            revoked: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Redeemable iff not revoked, not expired and not yet used.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.used && !self.is_expired(now)
    }
}

/// Result of the store's atomic check-and-set on the `used` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Presented token marked used and its replacement stored.
    Rotated,
    /// Another redemption already consumed the token.
    AlreadyUsed,
    /// The token was revoked before it could be rotated.
    Revoked,
    /// No token with that id exists.
    NotFound,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Token family exceeds {limit} tokens")]
pub struct FamilyWalkError {
    pub limit: usize,
}

/// Breadth-first worklist over a token family, rooted at one token and
/// following parent -> child links downwards.
///
/// Stores feed it children as they look them up, which keeps the walk
/// iterative and bounded whatever the chain length, and lets a store run the
/// whole walk inside a single transaction.
#[derive(Debug)]
pub struct FamilyWalk {
    queue: VecDeque<RefreshTokenId>,
    seen: HashSet<RefreshTokenId>,
    limit: usize,
}

impl FamilyWalk {
    pub const DEFAULT_LIMIT: usize = 10_000;

    pub fn new(root: RefreshTokenId, limit: usize) -> Self {
        let mut seen = HashSet::new();
        seen.insert(root);
        Self {
            queue: VecDeque::from([root]),
            seen,
            limit,
        }
    }

    pub fn next_id(&mut self) -> Option<RefreshTokenId> {
        self.queue.pop_front()
    }

    /// Queue children of the token last returned by [`FamilyWalk::next_id`].
    /// Ids already visited are skipped, so a corrupt cycle cannot loop.
    pub fn push_children<I>(&mut self, children: I) -> Result<(), FamilyWalkError>
    where
        I: IntoIterator<Item = RefreshTokenId>,
    {
        for child in children {
            if self.seen.insert(child) {
                if self.seen.len() > self.limit {
                    return Err(FamilyWalkError { limit: self.limit });
                }
                self.queue.push_back(child);
            }
        }
        Ok(())
    }

    pub fn visited(&self) -> usize {
        self.seen.len()
    }
}
