use chrono::Duration;
use serde::Deserialize;

/// Thresholds for the account guard.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LockoutPolicy {
    /// Failed attempts that trip the lock; the tripping attempt counts.
    pub max_failed_attempts: u32,
    pub lockout_minutes: i64,
}

impl LockoutPolicy {
    pub fn window(&self) -> Duration {
        Duration::minutes(self.lockout_minutes)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 15,
        }
    }
}
