use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};
use warden_core::{CredentialError, CredentialVerifier, Password, PasswordHashString};

use crate::config::HashingSettings;

const DUMMY_PASSWORD: &str = "warden-timing-equalizer";

/// Argon2id hashing with per-call random salts.
///
/// All hashing runs on the blocking pool so a slow hash never stalls the
/// async workers.
#[derive(Clone)]
pub struct Argon2CredentialVerifier {
    params: Params,
    dummy_hash: Secret<String>,
}

impl Argon2CredentialVerifier {
    pub fn new(settings: HashingSettings) -> Result<Self, CredentialError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| CredentialError::UnexpectedError(e.to_string()))?;

        let dummy_hash = hash_blocking(&params, &Secret::new(DUMMY_PASSWORD.to_string()))
            .map_err(CredentialError::HashingFailed)?;

        Ok(Self { params, dummy_hash })
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for Argon2CredentialVerifier {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordHashString, CredentialError> {
        let current_span: tracing::Span = tracing::Span::current();
        let params = self.params.clone();
        let password = password.as_ref().clone();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| hash_blocking(&params, &password))
        })
        .await
        .map_err(|e| CredentialError::UnexpectedError(e.to_string()))?;

        result
            .map(|hash| PasswordHashString::new(hash.expose_secret().to_owned()))
            .map_err(CredentialError::HashingFailed)
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(&self, password: &Password, hash: &PasswordHashString) -> bool {
        verify_on_blocking_pool(
            self.params.clone(),
            password.as_ref().clone(),
            hash.as_ref().clone(),
        )
        .await
    }

    #[tracing::instrument(name = "Verify dummy password hash", skip_all)]
    async fn verify_dummy(&self, password: &Password) {
        verify_on_blocking_pool(
            self.params.clone(),
            password.as_ref().clone(),
            self.dummy_hash.clone(),
        )
        .await;
    }
}

fn hasher(params: &Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
}

fn hash_blocking(params: &Params, password: &Secret<String>) -> Result<Secret<String>, String> {
    let salt: SaltString = SaltString::generate(rand_core::OsRng);
    hasher(params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|h| Secret::from(h.to_string()))
        .map_err(|e| e.to_string())
}

/// A malformed stored hash and a join failure both count as a mismatch.
async fn verify_on_blocking_pool(
    params: Params,
    candidate: Secret<String>,
    expected_hash: Secret<String>,
) -> bool {
    let current_span: tracing::Span = tracing::Span::current();

    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected = PasswordHash::new(expected_hash.expose_secret())
                .map_err(|e| e.to_string())?;
            hasher(&params)
                .verify_password(candidate.expose_secret().as_bytes(), &expected)
                .map_err(|e| e.to_string())
        })
    })
    .await;

    match result {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Password verification failed");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}
