use chrono::Duration;

use crate::helpers::{TestApp, TokenBody};

#[tokio::test]
async fn should_rotate_refresh_token() {
    let app = TestApp::new().await;
    let registered = app.register("rotate@example.com").await;

    let response = app.post_refresh(&registered.refresh_token).await;

    assert_eq!(response.status().as_u16(), 200);
    let rotated: TokenBody = response.json().await.unwrap();
    assert_ne!(rotated.refresh_token, registered.refresh_token);
    assert_ne!(rotated.access_token, registered.access_token);
}

#[tokio::test]
async fn should_return_401_and_revoke_descendants_on_reuse() {
    let app = TestApp::new().await;
    let registered = app.register("reuse@example.com").await;

    let first = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(first.status().as_u16(), 200);
    let rotated: TokenBody = first.json().await.unwrap();

    let replay = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(replay.status().as_u16(), 401);

    let descendant = app.post_refresh(&rotated.refresh_token).await;
    assert_eq!(descendant.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_for_unknown_and_expired_tokens() {
    let app = TestApp::new().await;
    let registered = app.register("expired@example.com").await;

    let unknown = app.post_refresh("not-a-real-token").await;
    assert_eq!(unknown.status().as_u16(), 401);

    app.clock.advance(Duration::days(7));
    let expired = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(expired.status().as_u16(), 401);
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_redemption_win() {
    let app = TestApp::new().await;
    let registered = app.register("race@example.com").await;

    let (a, b) = tokio::join!(
        app.post_refresh(&registered.refresh_token),
        app.post_refresh(&registered.refresh_token),
    );

    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, [200, 401]);
}
