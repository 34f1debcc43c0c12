//! Integration tests for account routes
//!
//! Covers registration, login, logout, and session resolution.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::json;
use pretty_assertions::assert_eq;
use tower::util::ServiceExt;

use tunescore::handlers;
use tunescore::state::AppState;
use tunescore::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Pull the session token out of a Set-Cookie header
fn session_token(response: &axum::response::Response) -> String {
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a session cookie")
        .to_str()
        .unwrap();
    cookie
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches("tunescore_session=")
        .to_string()
}

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json(
            "/api/accounts/register",
            json!({"username": "alice", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let token = session_token(&response);
    assert!(!token.is_empty());

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json(
            "/api/accounts/register",
            json!({"username": "alice", "password": "short"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/accounts/register",
            json!({"username": "alice", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/accounts/login",
            json!({"username": "alice", "password": "test password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!session_token(&response).is_empty());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/accounts/login",
            json!({"username": "alice", "password": "wrong password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_session() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_resolves_session() {
    let state = setup_test_app_state().await;
    let (account, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts/me")
                .header(header::COOKIE, format!("tunescore_session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["id"], account.id);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let state = setup_test_app_state().await;
    let (_, token) = create_test_session(&state.db, "alice").await;
    let cookie = format!("tunescore_session={}", token);

    let app = create_test_router(&state);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/accounts/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The deleted session no longer resolves
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
