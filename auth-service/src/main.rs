use std::sync::Arc;

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use warden::{
    Argon2CredentialVerifier, AuthOrchestrator, AuthService, JwtTokenSigner,
    PostgresAccountStore, PostgresRefreshTokenStore, SystemClock,
    adapters::config::AuthServiceSetting, configure_postgresql,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let config = AuthServiceSetting::load()?;

    let pg_pool = configure_postgresql(&config.postgres).await?;

    let account_store = PostgresAccountStore::new(pg_pool.clone());
    let token_store = PostgresRefreshTokenStore::new(pg_pool);
    let verifier = Argon2CredentialVerifier::new(config.hashing)?;
    let signer = JwtTokenSigner::new(&config.jwt)?;

    let orchestrator = AuthOrchestrator::new(
        account_store,
        token_store,
        Arc::new(verifier),
        Arc::new(signer),
        Arc::new(SystemClock),
    )
    .with_lockout_policy(config.lockout)
    .with_password_policy(config.password_policy);

    let listener = tokio::net::TcpListener::bind(&config.application.address).await?;
    tracing::info!("Starting auth service...");

    AuthService::new(orchestrator)
        .run_standalone(listener, Some(config.application.allowed_origins))
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
