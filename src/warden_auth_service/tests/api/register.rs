use crate::helpers::{PASSWORD, TestApp, TokenBody};

#[tokio::test]
async fn should_return_201_with_token_pair() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&serde_json::json!({
            "email": "new@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: TokenBody = response.json().await.unwrap();
    assert_eq!(body.token_type, "Bearer");
    assert_eq!(body.expires_in, 900);
    assert!(!body.access_token.is_empty());
    assert!(!body.refresh_token.is_empty());
}

#[tokio::test]
async fn should_return_409_for_taken_email() {
    let app = TestApp::new().await;
    app.register("taken@example.com").await;

    let response = app
        .post_register(&serde_json::json!({
            "email": "TAKEN@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn should_return_400_with_field_detail_for_weak_password() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&serde_json::json!({
            "email": "weak@example.com",
            "password": "password",
            "confirm_password": "password",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid input");
    let detail = body["fields"]["password"].as_str().unwrap();
    assert!(detail.contains("upper-case"), "{detail}");
    assert!(detail.contains("digit"), "{detail}");
}

#[tokio::test]
async fn should_return_400_for_confirmation_mismatch() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&serde_json::json!({
            "email": "mismatch@example.com",
            "password": PASSWORD,
            "confirm_password": "Secret2!",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["fields"]["confirm_password"].is_string());
}

#[tokio::test]
async fn should_return_400_for_malformed_input() {
    let app = TestApp::new().await;

    let test_cases = [
        (
            serde_json::json!({ "email": "not-an-email", "password": PASSWORD, "confirm_password": PASSWORD }),
            "email",
        ),
        (
            serde_json::json!({ "email": "ok@example.com", "password": "", "confirm_password": "" }),
            "password",
        ),
        (serde_json::json!({ "email": "ok@example.com" }), "body"),
    ];

    for (body, field) in test_cases {
        let response = app.post_register(&body).await;

        assert_eq!(response.status().as_u16(), 400, "input: {body}");
        let error: serde_json::Value = response.json().await.unwrap();
        assert!(error["fields"][field].is_string(), "input: {body}");
    }
}
