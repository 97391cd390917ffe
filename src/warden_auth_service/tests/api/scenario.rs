use chrono::Duration;

use crate::helpers::{PASSWORD, TestApp, TokenBody};

/// Register, get locked out, wait out the window, then replay a refresh token
/// and watch the whole family die.
#[tokio::test]
async fn register_lockout_unlock_and_refresh_reuse() {
    let app = TestApp::new().await;
    let registered = app.register("a@example.com").await;

    for attempt in 1..=5 {
        let response = app.login("a@example.com", "Wrong1!!").await;
        let expected = if attempt < 5 { 401 } else { 423 };
        assert_eq!(response.status().as_u16(), expected, "attempt {attempt}");
    }

    app.clock.advance(Duration::minutes(15));
    let login = app.login("a@example.com", PASSWORD).await;
    assert_eq!(login.status().as_u16(), 200);
    let session: TokenBody = login.json().await.unwrap();

    let first = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(first.status().as_u16(), 200);
    let rotated: TokenBody = first.json().await.unwrap();

    let second = app.post_refresh(&registered.refresh_token).await;
    assert_eq!(second.status().as_u16(), 401);
    assert_eq!(app.post_refresh(&rotated.refresh_token).await.status().as_u16(), 401);

    // The login session is a separate family and survives.
    let other_family = app.post_refresh(&session.refresh_token).await;
    assert_eq!(other_family.status().as_u16(), 200);
}
