use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use warden_core::{LockoutPolicy, PasswordPolicy};

use crate::config::constants::{defaults, env};

#[derive(Debug, Clone, Deserialize)]
pub struct AuthServiceSetting {
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    pub lockout: LockoutPolicy,
    pub password_policy: PasswordPolicy,
    pub hashing: HashingSettings,
    pub postgres: PostgresSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_days: i64,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: defaults::HASH_MEMORY_KIB,
            iterations: defaults::HASH_ITERATIONS,
            parallelism: defaults::HASH_PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

/// Origins allowed by the CORS layer. Accepts a JSON list or, from the
/// environment, a comma separated string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "OriginsRepr")]
pub struct AllowedOrigins(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OriginsRepr {
    List(Vec<String>),
    Joined(String),
}

impl From<OriginsRepr> for AllowedOrigins {
    fn from(repr: OriginsRepr) -> Self {
        let origins = match repr {
            OriginsRepr::List(list) => list,
            OriginsRepr::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };
        Self::new(origins)
    }
}

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            origins
                .into_iter()
                .map(Into::into)
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AuthServiceSetting {
    /// Layered load: built-in defaults, then `config/base.json` and
    /// `config/{APP_ENVIRONMENT}.json` if present, then `WARDEN__*`
    /// environment variables. `JWT_SECRET` and `DATABASE_URL` override
    /// everything else when set.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config_dir = std::env::var(env::CONFIG_DIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(defaults::CONFIG_DIR));
        let environment = std::env::var(env::APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| defaults::APP_ENVIRONMENT.to_string());

        let settings = Self::defaults()?
            .add_source(File::from(config_dir.join("base.json")).required(false))
            .add_source(File::from(config_dir.join(format!("{environment}.json"))).required(false))
            .add_source(
                Environment::with_prefix(env::PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("jwt.secret", std::env::var(env::JWT_SECRET_ENV_VAR).ok())?
            .set_override_option("postgres.url", std::env::var(env::DATABASE_URL_ENV_VAR).ok())?
            .build()?;

        settings.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let lockout = LockoutPolicy::default();
        let policy = PasswordPolicy::default();
        let hashing = HashingSettings::default();

        Config::builder()
            .set_default("application.address", defaults::APP_ADDRESS)?
            .set_default("application.allowed_origins", Vec::<String>::new())?
            .set_default("jwt.issuer", defaults::JWT_ISSUER)?
            .set_default("jwt.audience", defaults::JWT_AUDIENCE)?
            .set_default("jwt.access_token_ttl_seconds", defaults::ACCESS_TOKEN_TTL_SECONDS)?
            .set_default("jwt.refresh_token_ttl_days", defaults::REFRESH_TOKEN_TTL_DAYS)?
            .set_default("lockout.max_failed_attempts", i64::from(lockout.max_failed_attempts))?
            .set_default("lockout.lockout_minutes", lockout.lockout_minutes)?
            .set_default("password_policy.min_length", policy.min_length as i64)?
            .set_default("password_policy.require_uppercase", policy.require_uppercase)?
            .set_default("password_policy.require_lowercase", policy.require_lowercase)?
            .set_default("password_policy.require_digit", policy.require_digit)?
            .set_default("password_policy.require_symbol", policy.require_symbol)?
            .set_default("hashing.memory_kib", i64::from(hashing.memory_kib))?
            .set_default("hashing.iterations", i64::from(hashing.iterations))?
            .set_default("hashing.parallelism", i64::from(hashing.parallelism))?
            .set_default("postgres.max_connections", defaults::PG_MAX_CONNECTIONS)
    }
}
