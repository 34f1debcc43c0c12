//! Integration tests for rating routes
//!
//! Covers rating submission (verified and anonymous), summary retrieval,
//! target validation, and the API rate limit.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware, Router,
};
use serde_json::json;
use pretty_assertions::assert_eq;
use tower::util::ServiceExt;

use tunescore::config::Config;
use tunescore::handlers;
use tunescore::services::rate_limit::rate_limit_middleware;
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

fn rating_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/ratings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_anonymous_rating_is_unverified() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(rating_request(json!({"value": 7, "album_id": album.id})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["verified"], false);
    assert_eq!(body["summary"]["unverified_count"], 1);
    assert_eq!(body["summary"]["unverified_average"], 7.0);
    assert!(body["summary"]["verified_average"].is_null());
}

#[tokio::test]
async fn test_session_rating_is_verified() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/ratings")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, format!("tunescore_session={}", token))
                .body(Body::from(
                    json!({"value": 9, "album_id": album.id}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["verified"], true);
    assert_eq!(body["summary"]["verified_count"], 1);
    assert_eq!(body["summary"]["verified_average"], 9.0);
}

#[tokio::test]
async fn test_resubmission_replaces_verified_rating() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    for value in [3, 8] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/ratings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::COOKIE, format!("tunescore_session={}", token))
                    .body(Body::from(
                        json!({"value": value, "album_id": album.id}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/ratings/summary?kind=album&id={}", album.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["verified_count"], 1);
    assert_eq!(body["verified_average"], 8.0);
}

#[tokio::test]
async fn test_anonymous_ratings_accumulate() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    for value in [4, 6, 10] {
        let response = app
            .clone()
            .oneshot(rating_request(json!({"value": value, "artist_id": artist.id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/ratings/summary?kind=artist&id={}", artist.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["unverified_count"], 3);
    let average = body["unverified_average"].as_f64().unwrap();
    assert!((average - 20.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rating_value_out_of_range() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    for value in [0, 11, -3] {
        let response = app
            .clone()
            .oneshot(rating_request(json!({"value": value, "artist_id": artist.id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_rating_requires_exactly_one_target() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(rating_request(json!({"value": 5})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(rating_request(
            json!({"value": 5, "artist_id": 1, "album_id": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_rating_missing_target_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(rating_request(json!({"value": 5, "song_id": 999})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_rejects_unknown_kind() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ratings/summary?kind=playlist&id=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_api_rate_limit() {
    let db = setup_test_db().await;
    let config = Config {
        rate_limit_max_requests: 3,
        ..test_config()
    };
    let state = AppState::new(db, config);

    let app = Router::new()
        .nest(
            "/api",
            handlers::api_routes().layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            )),
        )
        .with_state(state.clone());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/artists")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artists")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}
