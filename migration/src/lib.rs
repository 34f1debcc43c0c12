pub use sea_orm_migration::prelude::*;

mod m20240201_000001_create_accounts_table;
mod m20240201_000002_create_sessions_table;
mod m20240201_000003_create_artists_table;
mod m20240201_000004_create_albums_table;
mod m20240201_000005_create_songs_table;
mod m20240201_000006_create_ratings_table;
mod m20240201_000007_create_reviews_table;
mod m20240201_000008_create_comments_table;
mod m20240201_000009_create_favorites_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240201_000001_create_accounts_table::Migration),
            Box::new(m20240201_000002_create_sessions_table::Migration),
            Box::new(m20240201_000003_create_artists_table::Migration),
            Box::new(m20240201_000004_create_albums_table::Migration),
            Box::new(m20240201_000005_create_songs_table::Migration),
            Box::new(m20240201_000006_create_ratings_table::Migration),
            Box::new(m20240201_000007_create_reviews_table::Migration),
            Box::new(m20240201_000008_create_comments_table::Migration),
            Box::new(m20240201_000009_create_favorites_table::Migration),
        ]
    }
}
