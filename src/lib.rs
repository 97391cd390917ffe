//! # Warden - Token Lifecycle Library
//!
//! Facade crate that re-exports the public APIs of the warden components:
//! short-lived JWT access tokens, rotating refresh tokens with reuse
//! detection, and account lockout.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `Account`, `RefreshToken`, etc.
//! - **Ports**: `AccountStore`, `RefreshTokenStore`, `CredentialVerifier`, `TokenSigner`, `Clock`
//! - **Use cases**: `LoginUseCase`, `RefreshUseCase`, etc. behind `AuthOrchestrator`
//! - **Adapters**: in-memory and PostgreSQL stores, Argon2id hashing, HS256 JWTs
//! - **Service**: `AuthService` - the HTTP entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use warden_core::*;
}

pub use warden_core::{
    AccessClaims, Account, AccountId, Email, LockoutPolicy, Password, PasswordPolicy,
    RefreshSecret, RefreshToken, Role, TokenPair,
};

// ============================================================================
// Ports
// ============================================================================

pub use warden_core::{
    AccountStore, AccountStoreError, Clock, CredentialVerifier, RefreshTokenStore,
    RefreshTokenStoreError, TokenSigner,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use warden_application::*;
}

pub use warden_application::{
    AuthOrchestrator, LoginOutcome, RefreshOutcome, RegisterOutcome,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Configuration
    pub mod config {
        pub use warden_adapters::config::*;
    }
}

pub use warden_adapters::{
    Argon2CredentialVerifier, HashMapAccountStore, HashMapRefreshTokenStore, JwtTokenSigner,
    ManualClock, PostgresAccountStore, PostgresRefreshTokenStore, SystemClock,
};

// ============================================================================
// HTTP
// ============================================================================

/// Axum handlers, extractor and error mapping
pub mod http {
    pub use warden_axum::*;
}

/// Main auth service
pub use warden_auth_service::{AuthService, configure_postgresql, get_postgres_pool};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the store traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
