pub mod accounts;
pub mod albums;
pub mod artists;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod html;
pub mod ratings;
pub mod reviews;
pub mod songs;
pub mod stats;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Artist CRUD
        .route("/artists", get(artists::list_artists))
        .route("/artists", post(artists::create_artist))
        .route("/artists/:id", get(artists::get_artist))
        .route("/artists/:id", patch(artists::update_artist))
        .route("/artists/:id", delete(artists::delete_artist))

        // Album CRUD
        .route("/albums", get(albums::list_albums))
        .route("/albums", post(albums::create_album))
        .route("/albums/:id", get(albums::get_album))
        .route("/albums/:id", patch(albums::update_album))
        .route("/albums/:id", delete(albums::delete_album))

        // Song CRUD
        .route("/songs", get(songs::list_songs))
        .route("/songs", post(songs::create_song))
        .route("/songs/:id", get(songs::get_song))
        .route("/songs/:id", patch(songs::update_song))
        .route("/songs/:id", delete(songs::delete_song))

        // Ratings
        .route("/ratings", post(ratings::submit_rating))
        .route("/ratings/summary", get(ratings::get_summary))

        // Reviews and comments
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews", post(reviews::create_review))
        .route("/comments", get(comments::list_comments))
        .route("/comments", post(comments::create_comment))

        // Favorites
        .route("/favorites", get(favorites::list_favorites))
        .route("/favorites/toggle", post(favorites::toggle_favorite))

        // Accounts
        .route("/accounts/register", post(accounts::register))
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/logout", post(accounts::logout))
        .route("/accounts/me", get(accounts::me))

        // Statistics
        .route("/stats", get(stats::get_stats))
}

pub fn html_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(html::index))
        .route("/artists", get(html::artists))
        .route("/artists/grid", get(html::artists_grid))
        .route("/artists/:id", get(html::artist_detail))
        .route("/albums/:id", get(html::album_detail))
        .route("/songs/:id", get(html::song_detail))
        .route("/profile/:username", get(html::profile))
        .route("/login", get(html::login_page))
        .route("/login", post(html::login_submit))
        .route("/register", post(html::register_submit))
        .route("/logout", post(html::logout_submit))
        .route("/ratings", post(html::rating_form))
        .route("/reviews", post(html::review_form))
        .route("/comments", post(html::comment_form))
        .route("/favorites/toggle", post(html::favorite_toggle_form))
}
