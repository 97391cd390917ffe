use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    email::Email, lockout::LockoutPolicy, password::PasswordHashString, role::Role,
};

pub type AccountId = Uuid;

/// Result of counting a wrong-password attempt against an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedLogin {
    /// The account stays open; `attempts` failures are on record.
    Counted { attempts: u32 },
    /// The account is locked until the given instant.
    LockedOut { until: DateTime<Utc> },
}

/// A registered account, together with its lockout bookkeeping.
///
/// The guard has two states. Open: `lockout_until` is absent or in the past.
/// Locked: `lockout_until` is in the future. Reads never change state.
/// Account stores apply [`Account::clear_lapsed_lockout`],
/// [`Account::record_failed_login`] and [`Account::reset_lockout`] to the
/// stored record under their own lock, so concurrent logins cannot overwrite
/// each other's counts.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    email: Email,
    password_hash: PasswordHashString,
    role: Role,
    failed_login_attempts: u32,
    lockout_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        email: Email,
        password_hash: PasswordHashString,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            failed_login_attempts: 0,
            lockout_until: None,
            created_at: now,
        }
    }

    /// Rebuild an account from persisted fields.
    pub fn restore(
        id: AccountId,
        email: Email,
        password_hash: PasswordHashString,
        role: Role,
        failed_login_attempts: u32,
        lockout_until: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            role,
            failed_login_attempts,
            lockout_until,
            created_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHashString {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn failed_login_attempts(&self) -> u32 {
        self.failed_login_attempts
    }

    pub fn lockout_until(&self) -> Option<DateTime<Utc>> {
        self.lockout_until
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True while a lockout window is still running at `now`.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_until, Some(until) if until > now)
    }

    /// True when a lockout was set and its window has ended.
    pub fn lockout_lapsed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_until, Some(until) if until <= now)
    }

    /// Locked -> Open once the window is over. Returns whether anything changed.
    pub fn clear_lapsed_lockout(&mut self, now: DateTime<Utc>) -> bool {
        if self.lockout_lapsed(now) {
            self.failed_login_attempts = 0;
            self.lockout_until = None;
            true
        } else {
            false
        }
    }

    /// Count a wrong-password attempt, locking the account when the policy
    /// threshold is reached.
    pub fn record_failed_login(
        &mut self,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> FailedLogin {
        if let Some(until) = self.lockout_until.filter(|until| *until > now) {
            return FailedLogin::LockedOut { until };
        }

        self.failed_login_attempts = self.failed_login_attempts.saturating_add(1);

        if self.failed_login_attempts >= policy.max_failed_attempts {
            let until = now + policy.window();
            self.lockout_until = Some(until);
            FailedLogin::LockedOut { until }
        } else {
            FailedLogin::Counted {
                attempts: self.failed_login_attempts,
            }
        }
    }

    /// Successful login: back to a clean Open state. Returns whether anything
    /// changed, so callers can skip a redundant write.
    pub fn reset_lockout(&mut self) -> bool {
        let changed = self.failed_login_attempts != 0 || self.lockout_until.is_some();
        self.failed_login_attempts = 0;
        self.lockout_until = None;
        changed
    }
}
