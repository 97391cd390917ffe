use chrono::Duration;

use crate::helpers::{PASSWORD, TestApp, TokenBody};

#[tokio::test]
async fn should_return_200_with_token_pair() {
    let app = TestApp::new().await;
    app.register("login@example.com").await;

    let response = app.login("Login@Example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: TokenBody = response.json().await.unwrap();
    assert_eq!(body.token_type, "Bearer");
}

#[tokio::test]
async fn should_return_401_for_unknown_email_and_wrong_password_alike() {
    let app = TestApp::new().await;
    app.register("known@example.com").await;

    let unknown = app.login("unknown@example.com", PASSWORD).await;
    let wrong = app.login("known@example.com", "Wrong1!!").await;

    assert_eq!(unknown.status().as_u16(), 401);
    assert_eq!(wrong.status().as_u16(), 401);
    let unknown: serde_json::Value = unknown.json().await.unwrap();
    let wrong: serde_json::Value = wrong.json().await.unwrap();
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn should_return_423_after_five_failures_until_window_passes() {
    let app = TestApp::new().await;
    app.register("locked@example.com").await;

    for _ in 0..4 {
        let response = app.login("locked@example.com", "Wrong1!!").await;
        assert_eq!(response.status().as_u16(), 401);
    }
    let fifth = app.login("locked@example.com", "Wrong1!!").await;
    assert_eq!(fifth.status().as_u16(), 423);
    let body: serde_json::Value = fifth.json().await.unwrap();
    assert!(body["locked_until"].is_string());

    let correct_while_locked = app.login("locked@example.com", PASSWORD).await;
    assert_eq!(correct_while_locked.status().as_u16(), 423);

    app.clock.advance(Duration::minutes(15));
    let after_window = app.login("locked@example.com", PASSWORD).await;
    assert_eq!(after_window.status().as_u16(), 200);
}

#[tokio::test]
async fn should_return_400_for_malformed_email() {
    let app = TestApp::new().await;

    let response = app.login("no-at-sign", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 400);
}
