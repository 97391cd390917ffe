use warden_core::{AccessClaims, Clock, InvalidToken, TokenSigner};

/// Verify use case - validates a bearer access token against the clock
pub struct VerifyAccessTokenUseCase<'a> {
    signer: &'a dyn TokenSigner,
    clock: &'a dyn Clock,
}

impl<'a> VerifyAccessTokenUseCase<'a> {
    pub fn new(signer: &'a dyn TokenSigner, clock: &'a dyn Clock) -> Self {
        Self { signer, clock }
    }

    #[tracing::instrument(name = "VerifyAccessTokenUseCase::execute", skip_all)]
    pub fn execute(&self, token: &str) -> Result<AccessClaims, InvalidToken> {
        self.signer.verify(token, self.clock.now())
    }
}
