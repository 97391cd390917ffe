use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use secrecy::ExposeSecret;
use uuid::Uuid;
use warden_core::{
    AccessClaims, Account, InvalidToken, IssuedAccessToken, RefreshSecret, TokenSigner,
    TokenSignerError,
};

use crate::config::JwtSettings;

/// HS256 keys shorter than this are refused at startup.
pub const MIN_SECRET_BYTES: usize = 32;

const REFRESH_SECRET_BYTES: usize = 32;

/// Stateless HS256 access tokens plus random opaque refresh secrets.
#[derive(Clone)]
pub struct JwtTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenSigner {
    pub fn new(settings: &JwtSettings) -> Result<Self, TokenSignerError> {
        let secret = settings.secret.expose_secret().as_bytes();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenSignerError::WeakSecret {
                min: MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }

        // Expiry is checked by hand against the injected clock, so the
        // library's wall-clock check and leeway are switched off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss", "aud"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_ttl: Duration::seconds(settings.access_token_ttl_seconds),
            refresh_ttl: Duration::days(settings.refresh_token_ttl_days),
        })
    }
}

impl TokenSigner for JwtTokenSigner {
    fn issue_access_token(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, TokenSignerError> {
        let jti = Uuid::new_v4().to_string();
        let expires_at = now + self.access_ttl;

        let claims = AccessClaims {
            sub: account.id().to_string(),
            email: account.email().as_str().to_string(),
            role: account.role(),
            jti: jti.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenSignerError::Encoding(e.to_string()))?;

        Ok(IssuedAccessToken {
            token,
            jti,
            expires_at,
            expires_in_seconds: self.access_ttl.num_seconds(),
        })
    }

    fn issue_refresh_secret(&self) -> RefreshSecret {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        rand::rng().fill(&mut bytes);
        RefreshSecret::new(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, InvalidToken> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                InvalidToken
            })?;

        if now.timestamp() >= claims.exp {
            tracing::debug!(jti = %claims.jti, "Access token expired");
            return Err(InvalidToken);
        }

        Ok(claims)
    }

    fn access_token_lifetime(&self) -> Duration {
        self.access_ttl
    }

    fn refresh_token_lifetime(&self) -> Duration {
        self.refresh_ttl
    }
}
