use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
        request,
    },
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use warden_adapters::config::AllowedOrigins;
use warden_application::AuthOrchestrator;
use warden_axum::routes::{login, logout, me, refresh, register, verify_token};
use warden_core::{AccountStore, RefreshTokenStore};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The token lifecycle routes, mounted under `/auth`.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Build the routes around an orchestrator.
    ///
    /// The orchestrator is the only router state. Its stores are handles to
    /// shared state, so cloning it per request is cheap.
    pub fn new<A, R>(orchestrator: AuthOrchestrator<A, R>) -> Self
    where
        A: AccountStore + Clone + 'static,
        R: RefreshTokenStore + Clone + 'static,
    {
        let routes = Router::new()
            .route("/register", post(register::<A, R>))
            .route("/login", post(login::<A, R>))
            .route("/refresh", post(refresh::<A, R>))
            .route("/logout", post(logout::<A, R>))
            .route("/me", get(me))
            .route("/verify-token", post(verify_token))
            .with_state(orchestrator);

        Self {
            router: Router::new().nest("/auth", routes),
        }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Convert the AuthService into a router that can be merged into another
    /// application.
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins
            && !allowed_origins.is_empty()
        {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        origin
                            .to_str()
                            .is_ok_and(|origin| allowed_origins.contains(origin))
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
