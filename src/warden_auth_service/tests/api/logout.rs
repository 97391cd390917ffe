use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_204_and_revoke_the_family() {
    let app = TestApp::new().await;
    let registered = app.register("logout@example.com").await;

    let response = app.post_logout(&registered.refresh_token).await;
    assert_eq!(response.status().as_u16(), 204);

    let refresh = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(refresh.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_204_for_unknown_or_repeated_logout() {
    let app = TestApp::new().await;
    let registered = app.register("twice@example.com").await;

    for token in [registered.refresh_token.as_str(), registered.refresh_token.as_str(), "unknown"] {
        let response = app.post_logout(token).await;
        assert_eq!(response.status().as_u16(), 204);
    }
}
