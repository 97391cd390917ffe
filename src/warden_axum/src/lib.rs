//! Axum binding for the warden token lifecycle.
//!
//! Handlers take an [`AuthOrchestrator`](warden_application::AuthOrchestrator)
//! as router state and are generic over the two stores, so the same routes
//! serve the in-memory and the PostgreSQL backends.
//!
//! ```ignore
//! use axum::{Router, routing::{get, post}};
//! use warden_axum::routes;
//!
//! let app = Router::new()
//!     .route("/login", post(routes::login::<A, R>))
//!     .route("/me", get(routes::me))
//!     .with_state(orchestrator);
//! ```

pub mod dto;
pub mod error;
pub mod extractors;
pub mod routes;

pub use dto::{LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse};
pub use error::{AuthApiError, ErrorResponse, FieldErrors};
pub use extractors::AuthenticatedUser;
