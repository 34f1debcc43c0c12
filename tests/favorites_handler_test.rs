//! Integration tests for favorite routes and the stats endpoint

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

fn toggle_request(cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/favorites/toggle")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("tunescore_session={}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_toggle_requires_login() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(toggle_request(None, json!({"artist_id": artist.id})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_toggle_on_then_off() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(toggle_request(Some(&token), json!({"artist_id": artist.id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["favorited"], true);

    let response = app
        .oneshot(toggle_request(Some(&token), json!({"artist_id": artist.id})))
        .await
        .unwrap();
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["favorited"], false);
}

#[tokio::test]
async fn test_toggle_target_must_exist() {
    let state = setup_test_app_state().await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(toggle_request(Some(&token), json!({"album_id": 999})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_favorites() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    for body in [json!({"artist_id": artist.id}), json!({"album_id": album.id})] {
        let response = app
            .clone()
            .oneshot(toggle_request(Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::COOKIE, format!("tunescore_session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    let favorites = body.as_array().unwrap();
    assert_eq!(favorites.len(), 2);

    let kinds: Vec<&str> = favorites
        .iter()
        .map(|f| f["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"artist"));
    assert!(kinds.contains(&"album"));
}

#[tokio::test]
async fn test_favorites_are_per_account() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let (_, alice) = create_test_session(&state.db, "alice").await;
    let (_, bob) = create_test_session(&state.db, "bob").await;

    let app = create_test_router(&state);
    app.clone()
        .oneshot(toggle_request(Some(&alice), json!({"artist_id": artist.id})))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::COOKIE, format!("tunescore_session={}", bob))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stats_counts() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;
    create_test_song(&state.db, album.id, artist.id, "Opener").await;
    let account = create_test_account(&state.db, "alice").await;
    create_test_rating(&state.db, album.id, 8, Some(account.id)).await;
    create_test_rating(&state.db, album.id, 5, None).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["total_artists"], 1);
    assert_eq!(body["total_albums"], 1);
    assert_eq!(body["total_songs"], 1);
    assert_eq!(body["total_accounts"], 1);
    assert_eq!(body["total_ratings"], 2);
    assert_eq!(body["verified_ratings"], 1);
}
