//! Axum route handlers. Each one parses its input into domain types, calls
//! the orchestrator and maps the tagged outcome onto a status code.

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod verify_token;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
pub use register::register;
pub use verify_token::verify_token;
