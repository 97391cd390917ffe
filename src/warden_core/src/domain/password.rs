use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

/// Hard upper bound on accepted input, so a caller cannot make the slow hash
/// chew through megabytes of password.
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
    #[error("Password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,
}

/// A plaintext secret presented by a caller.
///
/// Parsing only enforces the bounds every password must meet. Strength rules
/// apply at registration through [`PasswordPolicy`], never at login, so an
/// account created under an older policy can still sign in.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let len = value.expose_secret().chars().count();
        if len == 0 {
            return Err(PasswordError::Empty);
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

/// Stored output of the credential verifier, in PHC string format.
#[derive(Debug, Clone)]
pub struct PasswordHashString(Secret<String>);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(Secret::new(hash))
    }
}

impl AsRef<Secret<String>> for PasswordHashString {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("must be at least {0} characters")]
    TooShort(usize),
    #[error("must contain an upper-case letter")]
    MissingUppercase,
    #[error("must contain a lower-case letter")]
    MissingLowercase,
    #[error("must contain a digit")]
    MissingDigit,
    #[error("must contain a symbol")]
    MissingSymbol,
}

/// Strength rules applied to newly chosen passwords.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password breaks; an empty list means it passes.
    pub fn check(&self, password: &Password) -> Vec<PolicyViolation> {
        let raw = password.as_ref().expose_secret();
        let mut violations = Vec::new();

        if raw.chars().count() < self.min_length {
            violations.push(PolicyViolation::TooShort(self.min_length));
        }
        if self.require_uppercase && !raw.chars().any(char::is_uppercase) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if self.require_lowercase && !raw.chars().any(char::is_lowercase) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if self.require_digit && !raw.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }
        if self.require_symbol && !raw.chars().any(|c| !c.is_alphanumeric()) {
            violations.push(PolicyViolation::MissingSymbol);
        }

        violations
    }
}
