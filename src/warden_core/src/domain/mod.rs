pub mod access_token;
pub mod account;
pub mod email;
pub mod lockout;
pub mod password;
pub mod refresh_token;
pub mod role;
pub mod token_pair;
