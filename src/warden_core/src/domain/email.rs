use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("email regex is valid")
});

const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email must not be empty")]
    Empty,
    #[error("Email must be at most {MAX_EMAIL_LENGTH} characters")]
    TooLong,
    #[error("Email is not a valid address")]
    Malformed,
}

/// Normalized account identifier.
///
/// Parsing trims surrounding whitespace and lower-cases the address, so two
/// spellings of the same mailbox always map to the same account.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(Secret::new(normalized)))
    }

    /// Wrap an address that was normalized and validated before it was
    /// stored, such as a column read back from the account table.
    pub fn from_trusted(normalized: String) -> Self {
        Self(Secret::new(normalized))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value.expose_secret())
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
