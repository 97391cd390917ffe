pub mod clock;
pub mod config;
pub mod credentials;
pub mod persistence;
pub mod tokens;

pub use clock::{ManualClock, SystemClock};
pub use credentials::argon2_credential_verifier::Argon2CredentialVerifier;
pub use persistence::{
    hashmap_account_store::HashMapAccountStore,
    hashmap_refresh_token_store::HashMapRefreshTokenStore,
    postgres_account_store::PostgresAccountStore,
    postgres_refresh_token_store::PostgresRefreshTokenStore,
};
pub use tokens::jwt_token_signer::JwtTokenSigner;
