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
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorites::AccountId).integer().not_null())
                    .col(ColumnDef::new(Favorites::ArtistId).integer())
                    .col(ColumnDef::new(Favorites::AlbumId).integer())
                    .col(ColumnDef::new(Favorites::SongId).integer())
                    .col(
                        ColumnDef::new(Favorites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_account_id")
                            .from(Favorites::Table, Favorites::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_artist_id")
                            .from(Favorites::Table, Favorites::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_album_id")
                            .from(Favorites::Table, Favorites::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_song_id")
                            .from(Favorites::Table, Favorites::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite per account per target column
        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_account_artist")
                    .table(Favorites::Table)
                    .col(Favorites::AccountId)
                    .col(Favorites::ArtistId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_account_album")
                    .table(Favorites::Table)
                    .col(Favorites::AccountId)
                    .col(Favorites::AlbumId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_account_song")
                    .table(Favorites::Table)
                    .col(Favorites::AccountId)
                    .col(Favorites::SongId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Favorites {
    Table,
    Id,
    AccountId,
    ArtistId,
    AlbumId,
    SongId,
    CreatedAt,
}
