use sea_orm_migration::prelude::*;

use super::m20240201_000001_create_accounts_table::Accounts;
use super::m20240201_000003_create_artists_table::Artists;
use super::m20240201_000004_create_albums_table::Albums;
use super::m20240201_000005_create_songs_table::Songs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ratings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ratings::Value).integer().not_null())
                    .col(
                        ColumnDef::new(Ratings::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Ratings::AccountId).integer())
                    .col(ColumnDef::new(Ratings::ArtistId).integer())
                    .col(ColumnDef::new(Ratings::AlbumId).integer())
                    .col(ColumnDef::new(Ratings::SongId).integer())
                    .col(
                        ColumnDef::new(Ratings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ratings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_account_id")
                            .from(Ratings::Table, Ratings::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_artist_id")
                            .from(Ratings::Table, Ratings::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_album_id")
                            .from(Ratings::Table, Ratings::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_song_id")
                            .from(Ratings::Table, Ratings::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_artist_id")
                    .table(Ratings::Table)
                    .col(Ratings::ArtistId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_album_id")
                    .table(Ratings::Table)
                    .col(Ratings::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_song_id")
                    .table(Ratings::Table)
                    .col(Ratings::SongId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_account_id")
                    .table(Ratings::Table)
                    .col(Ratings::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Ratings {
    Table,
    Id,
    Value,
    Verified,
    AccountId,
    ArtistId,
    AlbumId,
    SongId,
    CreatedAt,
    UpdatedAt,
}
