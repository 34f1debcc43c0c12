use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::{albums, artists},
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::ratings,
    state::AppState,
};

#[derive(Deserialize)]
pub struct ListAlbumsQuery {
    pub artist_id: Option<i32>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    50
}

#[derive(Serialize)]
pub struct AlbumResponse {
    pub id: i32,
    pub title: String,
    pub artist: ArtistRef,
    pub release_date: Option<String>,
    pub cover_art_url: Option<String>,
    pub rating: ratings::RatingSummary,
}

#[derive(Serialize)]
pub struct AlbumListItem {
    pub id: i32,
    pub title: String,
    pub artist: ArtistRef,
    pub release_date: Option<String>,
    pub cover_art_url: Option<String>,
}

#[derive(Serialize)]
pub struct ArtistRef {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize)]
pub struct PaginatedAlbumsResponse {
    pub albums: Vec<AlbumListItem>,
    pub pagination: PaginationInfo,
}

#[derive(Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub artist_id: i32,
    pub release_date: Option<chrono::NaiveDate>,
    pub cover_art_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAlbumRequest {
    pub title: Option<String>,
    pub release_date: Option<chrono::NaiveDate>,
    pub cover_art_url: Option<String>,
}

pub async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<ListAlbumsQuery>,
) -> Result<Json<PaginatedAlbumsResponse>> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 200);

    let mut select = albums::Entity::find();

    if let Some(artist_id) = query.artist_id {
        select = select.filter(albums::Column::ArtistId.eq(artist_id));
    }

    if let Some(search) = &query.search {
        if !search.is_empty() {
            select = select.filter(albums::Column::Title.contains(search));
        }
    }

    let total_items = select.clone().count(&state.db).await?;
    let total_pages = (total_items + page_size - 1) / page_size;

    let albums = select
        .order_by_desc(albums::Column::CreatedAt)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .find_also_related(artists::Entity)
        .all(&state.db)
        .await?;

    let albums: Vec<AlbumListItem> = albums
        .into_iter()
        .filter_map(|(album, artist)| {
            artist.map(|a| AlbumListItem {
                id: album.id,
                title: album.title,
                artist: ArtistRef {
                    id: a.id,
                    name: a.name,
                },
                release_date: album.release_date.map(|d| d.to_string()),
                cover_art_url: album.cover_art_url,
            })
        })
        .collect();

    Ok(Json(PaginatedAlbumsResponse {
        albums,
        pagination: PaginationInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    }))
}

pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AlbumResponse>> {
    let album_with_artist = albums::Entity::find_by_id(id)
        .find_also_related(artists::Entity)
        .one(&state.db)
        .await?;

    match album_with_artist {
        Some((album, Some(artist))) => {
            let target = ContentRef::new(TargetKind::Album, album.id);
            let rating = ratings::cached_rating_summary(&state, &target).await?;

            Ok(Json(AlbumResponse {
                id: album.id,
                title: album.title,
                artist: ArtistRef {
                    id: artist.id,
                    name: artist.name,
                },
                release_date: album.release_date.map(|d| d.to_string()),
                cover_art_url: album.cover_art_url,
                rating,
            }))
        }
        _ => Err(AppError::NotFound("Album not found".to_string())),
    }
}

pub async fn create_album(
    State(state): State<AppState>,
    Json(payload): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<albums::Model>)> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Album title must not be empty".to_string()));
    }

    let artist = artists::Entity::find_by_id(payload.artist_id)
        .one(&state.db)
        .await?;
    if artist.is_none() {
        return Err(AppError::Validation(format!(
            "Artist {} does not exist",
            payload.artist_id
        )));
    }

    let now = Utc::now().into();
    let album = albums::ActiveModel {
        title: Set(title.to_string()),
        artist_id: Set(payload.artist_id),
        release_date: Set(payload.release_date),
        cover_art_url: Set(payload.cover_art_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = album.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAlbumRequest>,
) -> Result<Json<albums::Model>> {
    let album = albums::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

    let mut active: albums::ActiveModel = album.into();

    if let Some(title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Album title must not be empty".to_string()));
        }
        active.title = Set(title.trim().to_string());
    }
    if let Some(date) = payload.release_date {
        active.release_date = Set(Some(date));
    }
    if let Some(url) = payload.cover_art_url {
        active.cover_art_url = Set(Some(url));
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.db).await?;
    Ok(Json(updated))
}

pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let album = albums::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

    album.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
