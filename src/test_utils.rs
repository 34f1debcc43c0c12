//! Test utilities for Tunescore
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories
//! - Test data generators

use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::{
    config::Config,
    db::entities::{accounts, albums, artists, ratings, songs},
    services::accounts as account_service,
    state::AppState,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        cache_ttl_secs: 300,
        rate_limit_max_requests: 1000,
        rate_limit_window_secs: 60,
        session_ttl_hours: 24,
    }
}

/// Create a complete test AppState with an isolated database
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, test_config())
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create a test artist in the database
pub async fn create_test_artist(db: &DatabaseConnection, name: &str) -> artists::Model {
    let now = Utc::now().into();
    let artist = artists::ActiveModel {
        name: Set(name.to_string()),
        bio: Set(None),
        image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    artist.insert(db).await.expect("Failed to insert test artist")
}

/// Create a test album in the database
pub async fn create_test_album(
    db: &DatabaseConnection,
    artist_id: i32,
    title: &str,
) -> albums::Model {
    let now = Utc::now().into();
    let album = albums::ActiveModel {
        artist_id: Set(artist_id),
        title: Set(title.to_string()),
        release_date: Set(None),
        cover_art_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    album.insert(db).await.expect("Failed to insert test album")
}

/// Create a test song in the database
pub async fn create_test_song(
    db: &DatabaseConnection,
    album_id: i32,
    artist_id: i32,
    title: &str,
) -> songs::Model {
    let now = Utc::now().into();
    let song = songs::ActiveModel {
        title: Set(title.to_string()),
        album_id: Set(album_id),
        artist_id: Set(artist_id),
        track_number: Set(Some(1)),
        duration_ms: Set(Some(180_000)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    song.insert(db).await.expect("Failed to insert test song")
}

/// Create a test account with password "test password"
pub async fn create_test_account(db: &DatabaseConnection, username: &str) -> accounts::Model {
    account_service::register_account(db, username, "test password", None)
        .await
        .expect("Failed to insert test account")
}

/// Create an account plus an active session, returning the session token
pub async fn create_test_session(db: &DatabaseConnection, username: &str) -> (accounts::Model, String) {
    let account = create_test_account(db, username).await;
    let token = account_service::create_session(db, account.id, 24)
        .await
        .expect("Failed to create test session");
    (account, token)
}

/// Insert a rating row directly, bypassing validation
pub async fn create_test_rating(
    db: &DatabaseConnection,
    album_id: i32,
    value: i32,
    account_id: Option<i32>,
) -> ratings::Model {
    let now = Utc::now().into();
    let rating = ratings::ActiveModel {
        value: Set(value),
        verified: Set(account_id.is_some()),
        account_id: Set(account_id),
        artist_id: Set(None),
        album_id: Set(Some(album_id)),
        song_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    rating.insert(db).await.expect("Failed to insert test rating")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::sessions;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        let artists = artists::Entity::find().all(&db).await.unwrap();
        assert_eq!(artists.len(), 0);
    }

    #[tokio::test]
    async fn test_create_test_album() {
        let db = setup_test_db().await;
        let artist = create_test_artist(&db, "Test Artist").await;
        let album = create_test_album(&db, artist.id, "Test Album").await;

        assert_eq!(album.title, "Test Album");
        assert_eq!(album.artist_id, artist.id);
    }

    #[tokio::test]
    async fn test_create_test_session() {
        let db = setup_test_db().await;
        let (account, token) = create_test_session(&db, "alice").await;

        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.account_id, account.id);
    }

    #[tokio::test]
    async fn test_parallel_databases() {
        // Separate in-memory databases must not share state
        let (db1, db2) = tokio::join!(setup_test_db(), setup_test_db());

        let artist1 = create_test_artist(&db1, "Artist 1").await;
        let artist2 = create_test_artist(&db2, "Artist 2").await;

        assert_eq!(artist1.id, 1);
        assert_eq!(artist2.id, 1);
    }
}
