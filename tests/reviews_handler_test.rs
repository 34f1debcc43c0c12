//! Integration tests for review and comment routes

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

fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("tunescore_session={}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_create_anonymous_review() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/reviews",
            None,
            json!({"content": "A solid record.", "album_id": album.id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["content"], "A solid record.");
    assert_eq!(body["verified"], false);
    assert!(body["author"].is_null());
}

#[tokio::test]
async fn test_create_verified_review_carries_author() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/reviews",
            Some(&token),
            json!({"content": "Seen them live, incredible.", "artist_id": artist.id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["verified"], true);
    assert_eq!(body["author"], "alice");
}

#[tokio::test]
async fn test_review_content_must_not_be_empty() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/reviews",
            None,
            json!({"content": "   ", "artist_id": artist.id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_review_target_must_exist() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json(
            "/api/reviews",
            None,
            json!({"content": "Ghost review", "song_id": 12345}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reviews_paginated() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;

    let app = create_test_router(&state);
    for i in 1..=5 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/reviews",
                None,
                json!({"content": format!("Review {}", i), "album_id": album.id}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/reviews?kind=album&id={}&page=1&page_size=2",
                    album.id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total_items"], 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn test_list_reviews_scoped_to_target() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;

    let app = create_test_router(&state);
    app.clone()
        .oneshot(post_json(
            "/api/reviews",
            None,
            json!({"content": "About the artist", "artist_id": artist.id}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/reviews",
            None,
            json!({"content": "About the album", "album_id": album.id}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/reviews?kind=artist&id={}", artist.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["content"], "About the artist");
}

#[tokio::test]
async fn test_create_and_list_comments() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;
    let song = create_test_song(&state.db, album.id, artist.id, "Opener").await;
    let (_, token) = create_test_session(&state.db, "bob").await;

    let app = create_test_router(&state);
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/comments",
            Some(&token),
            json!({"content": "Great intro riff", "song_id": song.id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/comments?kind=song&id={}", song.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Great intro riff");
    assert_eq!(comments[0]["author"], "bob");
}

#[tokio::test]
async fn test_comment_content_must_not_be_empty() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_json(
            "/api/comments",
            None,
            json!({"content": "", "artist_id": artist.id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
