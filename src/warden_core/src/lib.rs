pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    access_token::{AccessClaims, IssuedAccessToken},
    account::{Account, AccountId, FailedLogin},
    email::{Email, EmailError},
    lockout::LockoutPolicy,
    password::{Password, PasswordError, PasswordHashString, PasswordPolicy, PolicyViolation},
    refresh_token::{
        FamilyWalk, FamilyWalkError, RefreshSecret, RefreshToken, RefreshTokenId, RotationOutcome,
    },
    role::Role,
    token_pair::TokenPair,
};

pub use ports::{
    repositories::{AccountStore, AccountStoreError, RefreshTokenStore, RefreshTokenStoreError},
    services::{
        Clock, CredentialError, CredentialVerifier, InvalidToken, TokenSigner, TokenSignerError,
    },
};
