pub mod orchestrator;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use orchestrator::AuthOrchestrator;

pub use use_cases::{
    issuance::mint_token_pair,
    login::{LoginError, LoginOutcome, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    refresh::{RefreshError, RefreshOutcome, RefreshUseCase},
    register::{RegisterError, RegisterOutcome, RegisterUseCase},
    verify::VerifyAccessTokenUseCase,
};
