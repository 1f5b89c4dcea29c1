//! 认证 API 集成测试

use axum::http::StatusCode;
use serde_json::json;
use storefront_api::{auth::JwtService, models::messages, repository::CredentialStore};
use uuid::Uuid;

mod common;
use common::{default_test_app, get, post_json, TEST_SECRET};

#[tokio::test]
async fn test_register_then_duplicate() {
    let app = default_test_app();

    let (status, body) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], messages::REGISTER_SUCCESS);
    assert_eq!(body["username"], "alice");
    assert!(Uuid::parse_str(body["userId"].as_str().unwrap()).is_ok());
    // 注册不签发令牌
    assert!(body.get("token").is_none());
    assert_eq!(app.store.len(), 1);

    let (status, body) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "other"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], messages::USER_EXISTS);
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_register_does_not_store_plaintext() {
    let app = default_test_app();

    post_json(
        app.router(),
        "/api/register",
        json!({"username": "bob", "password": "plain-pw"}),
    )
    .await;

    let user = app
        .store
        .find_by_username("bob")
        .await
        .unwrap()
        .expect("user stored");
    assert_ne!(user.password_hash, "plain-pw");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_login_success_returns_token() {
    let app = default_test_app();

    let (_, registered) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    let (status, body) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], messages::LOGIN_SUCCESS);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["userId"], registered["userId"]);

    let token = body["token"].as_str().expect("token present");
    let jwt = JwtService::new(TEST_SECRET, 604800).unwrap();
    let claims = jwt.verify(token).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.user_id, registered["userId"].as_str().unwrap());
    assert_eq!(claims.exp - claims.iat, 604800);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = default_test_app();

    post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    let (status, body) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], messages::INVALID_CREDENTIALS);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_unknown_user_same_response() {
    let app = default_test_app();

    post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    let (unknown_status, unknown) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "ghost", "password": "x"}),
    )
    .await;
    let (wrong_status, wrong) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "alice", "password": "x"}),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);
    assert!(unknown.get("token").is_none());
}

#[tokio::test]
async fn test_missing_credentials() {
    let app = default_test_app();

    let cases = [
        json!({"password": "x"}),
        json!({"username": "alice"}),
        json!({"username": "", "password": "x"}),
        json!({"username": "   ", "password": "x"}),
        json!({"username": "alice", "password": ""}),
        json!({}),
    ];

    for case in cases {
        let (status, body) = post_json(app.router(), "/api/register", case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "register {}", case);
        assert_eq!(body["message"], messages::CREDENTIALS_REQUIRED);

        let (status, body) = post_json(app.router(), "/api/login", case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "login {}", case);
        assert_eq!(body["message"], messages::CREDENTIALS_REQUIRED);
    }

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_whitespace_password_round_trip() {
    let app = default_test_app();

    let (status, _) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "bob", "password": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "bob", "password": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    // 空格数量不同就是不同的密码
    let (status, _) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "bob", "password": " "}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = default_test_app();

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_usernames_are_case_sensitive() {
    let app = default_test_app();

    let (status, _) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "a"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post_json(
        app.router(),
        "/api/register",
        json!({"username": "Alice", "password": "b"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.store.len(), 2);
}

// ==================== /api/me ====================

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = default_test_app();

    post_json(
        app.router(),
        "/api/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;
    let (_, login) = post_json(
        app.router(),
        "/api/login",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    let bearer = format!("Bearer {}", login["token"].as_str().unwrap());
    let (status, body) = get(app.router(), "/api/me", Some(&bearer)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["userId"], login["userId"]);
    assert!(body["expiresAt"].as_i64().unwrap() > body["issuedAt"].as_i64().unwrap());
}

#[tokio::test]
async fn test_me_without_token() {
    let app = default_test_app();

    let (status, body) = get(app.router(), "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], messages::TOKEN_REQUIRED);

    let (status, _) = get(app.router(), "/api/me", Some("Basic abc")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(app.router(), "/api/me", Some("Bearer ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_invalid_or_expired_token() {
    let app = default_test_app();

    let (status, body) = get(app.router(), "/api/me", Some("Bearer garbage.token.value")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], messages::TOKEN_INVALID);

    let jwt = JwtService::new(TEST_SECRET, 604800).unwrap();
    let expired = jwt
        .issue_with_ttl(&Uuid::new_v4(), "alice", chrono::Duration::seconds(-10))
        .unwrap();
    let (status, body) = get(app.router(), "/api/me", Some(&format!("Bearer {}", expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], messages::TOKEN_INVALID);

    let foreign = JwtService::new("another-secret-key-that-is-32-chars-long!!", 604800)
        .unwrap()
        .issue(&Uuid::new_v4(), "alice")
        .unwrap();
    let (status, _) = get(app.router(), "/api/me", Some(&format!("Bearer {}", foreign))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
