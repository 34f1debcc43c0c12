//! Integration tests for the server-rendered HTML routes

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use tower::util::ServiceExt;

use tunescore::handlers;
use tunescore::state::AppState;
use tunescore::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .merge(handlers::html_routes())
        .with_state(state.clone())
}

async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn form_request(uri: &str, cookie: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("tunescore_session={}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_index_renders() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Tunescore"));
}

#[tokio::test]
async fn test_artist_grid_partial_contains_artists() {
    let state = setup_test_app_state().await;
    create_test_artist(&state.db, "Radiohead").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/artists/grid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Radiohead"));
}

#[tokio::test]
async fn test_searched_artist_grid_pages_keep_the_search() {
    let state = setup_test_app_state().await;
    // Two pages' worth of matches at the grid page size of 20
    for i in 1..=21 {
        create_test_artist(&state.db, &format!("Matching Artist {:02}", i)).await;
    }

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/artists/grid?search=Matching")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("search=Matching&amp;page=2"));
    assert!(!html.contains("Matching?page="));
}

#[tokio::test]
async fn test_artist_detail_page_shows_albums_and_ratings() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    create_test_album(&state.db, artist.id, "Debut Record").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/artists/{}", artist.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Band"));
    assert!(html.contains("Debut Record"));
    assert!(html.contains(&format!("rating-summary-artist-{}", artist.id)));
}

#[tokio::test]
async fn test_artist_detail_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/artists/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_form_returns_refreshed_panel() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let album = create_test_album(&state.db, artist.id, "Record").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(form_request(
            "/ratings",
            None,
            format!("kind=album&id={}&value=8", album.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(&format!("rating-summary-album-{}", album.id)));
    assert!(html.contains("8.0"));
}

#[tokio::test]
async fn test_review_form_returns_refreshed_list() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;
    let (_, token) = create_test_session(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(form_request(
            "/reviews",
            Some(&token),
            format!("kind=artist&id={}&content=Fantastic+live+act", artist.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Fantastic live act"));
    assert!(html.contains("alice"));
}

#[tokio::test]
async fn test_favorite_toggle_requires_login() {
    let state = setup_test_app_state().await;
    let artist = create_test_artist(&state.db, "Band").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(form_request(
            "/favorites/toggle",
            None,
            format!("kind=artist&id={}", artist.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_flow_sets_cookie_and_redirects() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(form_request(
            "/login",
            None,
            "username=alice&password=test+password".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_login_failure_rerenders_form() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(form_request(
            "/login",
            None,
            "username=alice&password=nope+nope".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_profile_page() {
    let state = setup_test_app_state().await;
    create_test_account(&state.db, "alice").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile/alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("@alice"));
}
