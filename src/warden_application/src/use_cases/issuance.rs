use chrono::{DateTime, Utc};
use warden_core::{
    Account, RefreshToken, RefreshTokenId, TokenPair, TokenSigner, TokenSignerError,
};

/// Sign an access token and draw a refresh secret for `account`.
///
/// Returns the pair for the client together with the refresh record to
/// persist; the caller decides whether that is a plain insert (login,
/// registration) or an atomic rotation (refresh).
pub fn mint_token_pair(
    signer: &dyn TokenSigner,
    account: &Account,
    parent_id: Option<RefreshTokenId>,
    now: DateTime<Utc>,
) -> Result<(TokenPair, RefreshToken), TokenSignerError> {
    let access = signer.issue_access_token(account, now)?;
    let secret = signer.issue_refresh_secret();
    let record = RefreshToken::issue(
        account.id(),
        &secret,
        parent_id,
        now,
        signer.refresh_token_lifetime(),
    );

    let pair = TokenPair {
        access_token: access.token,
        refresh_token: secret,
        expires_in_seconds: access.expires_in_seconds,
    };

    Ok((pair, record))
}
