use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reqwest::{Client, Response};
use secrecy::Secret;
use serde::Deserialize;
use tokio::net::TcpListener;
use warden_adapters::{
    Argon2CredentialVerifier, HashMapAccountStore, HashMapRefreshTokenStore, JwtTokenSigner,
    ManualClock,
    config::{AllowedOrigins, HashingSettings, JwtSettings, test},
};
use warden_application::AuthOrchestrator;
use warden_auth_service::AuthService;

pub const PASSWORD: &str = "Secret1!";

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub clock: ManualClock,
}

#[derive(Debug, Deserialize)]
pub struct TokenBody {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());

        let signer = JwtTokenSigner::new(&JwtSettings {
            secret: Secret::new(test::JWT_SECRET.to_string()),
            issuer: test::JWT_ISSUER.to_string(),
            audience: test::JWT_AUDIENCE.to_string(),
            access_token_ttl_seconds: 15 * 60,
            refresh_token_ttl_days: 7,
        })
        .expect("Failed to build token signer");
        let verifier = Argon2CredentialVerifier::new(HashingSettings {
            memory_kib: test::HASH_MEMORY_KIB,
            iterations: test::HASH_ITERATIONS,
            parallelism: test::HASH_PARALLELISM,
        })
        .expect("Failed to build credential verifier");

        let orchestrator = AuthOrchestrator::new(
            HashMapAccountStore::new(),
            HashMapRefreshTokenStore::new(),
            Arc::new(verifier),
            Arc::new(signer),
            Arc::new(clock.clone()),
        );

        let listener = TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let allowed_origins = AllowedOrigins::new(["http://app.example.com"]);
        tokio::spawn(
            AuthService::new(orchestrator).run_standalone(listener, Some(allowed_origins)),
        );

        Self {
            address,
            http_client: Client::new(),
            clock,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth{}", self.address, path)
    }

    pub async fn post_register(&self, body: &serde_json::Value) -> Response {
        self.post_json("/register", body).await
    }

    pub async fn post_login(&self, body: &serde_json::Value) -> Response {
        self.post_json("/login", body).await
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> Response {
        self.post_json(
            "/refresh",
            &serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    pub async fn post_logout(&self, refresh_token: &str) -> Response {
        self.post_json(
            "/logout",
            &serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    pub async fn get_me(&self, access_token: Option<&str>) -> Response {
        let mut request = self.http_client.get(self.url("/me"));
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_verify_token(&self, access_token: &str) -> Response {
        self.http_client
            .post(self.url("/verify-token"))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Response {
        self.http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers `email` with [`PASSWORD`] and returns the issued pair.
    pub async fn register(&self, email: &str) -> TokenBody {
        let response = self
            .post_register(&serde_json::json!({
                "email": email,
                "password": PASSWORD,
                "confirm_password": PASSWORD,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse token body")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_login(&serde_json::json!({ "email": email, "password": password }))
            .await
    }
}
