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
    db::entities::{albums, songs},
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::ratings,
    state::AppState,
};

#[derive(Deserialize)]
pub struct ListSongsQuery {
    pub album_id: Option<i32>,
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
pub struct SongResponse {
    pub id: i32,
    pub title: String,
    pub album_id: i32,
    pub artist_id: i32,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i32>,
    pub rating: ratings::RatingSummary,
}

#[derive(Serialize)]
pub struct PaginatedSongsResponse {
    pub songs: Vec<songs::Model>,
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
pub struct CreateSongRequest {
    pub title: String,
    pub album_id: i32,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i32>,
}

pub async fn list_songs(
    State(state): State<AppState>,
    Query(query): Query<ListSongsQuery>,
) -> Result<Json<PaginatedSongsResponse>> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 200);

    let mut select = songs::Entity::find();

    if let Some(album_id) = query.album_id {
        select = select.filter(songs::Column::AlbumId.eq(album_id));
    }

    if let Some(artist_id) = query.artist_id {
        select = select.filter(songs::Column::ArtistId.eq(artist_id));
    }

    if let Some(search) = &query.search {
        if !search.is_empty() {
            select = select.filter(songs::Column::Title.contains(search));
        }
    }

    let total_items = select.clone().count(&state.db).await?;
    let total_pages = (total_items + page_size - 1) / page_size;

    let songs = select
        .order_by_asc(songs::Column::AlbumId)
        .order_by_asc(songs::Column::TrackNumber)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(&state.db)
        .await?;

    Ok(Json(PaginatedSongsResponse {
        songs,
        pagination: PaginationInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    }))
}

pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SongResponse>> {
    let song = songs::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Song not found".to_string()))?;

    let target = ContentRef::new(TargetKind::Song, song.id);
    let rating = ratings::cached_rating_summary(&state, &target).await?;

    Ok(Json(SongResponse {
        id: song.id,
        title: song.title,
        album_id: song.album_id,
        artist_id: song.artist_id,
        track_number: song.track_number,
        duration_ms: song.duration_ms,
        rating,
    }))
}

pub async fn create_song(
    State(state): State<AppState>,
    Json(payload): Json<CreateSongRequest>,
) -> Result<(StatusCode, Json<songs::Model>)> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Song title must not be empty".to_string()));
    }

    // The owning album determines the song's artist
    let album = albums::Entity::find_by_id(payload.album_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("Album {} does not exist", payload.album_id))
        })?;

    let now = Utc::now().into();
    let song = songs::ActiveModel {
        title: Set(title.to_string()),
        album_id: Set(album.id),
        artist_id: Set(album.artist_id),
        track_number: Set(payload.track_number),
        duration_ms: Set(payload.duration_ms),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = song.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSongRequest>,
) -> Result<Json<songs::Model>> {
    let song = songs::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Song not found".to_string()))?;

    let mut active: songs::ActiveModel = song.into();

    if let Some(title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Song title must not be empty".to_string()));
        }
        active.title = Set(title.trim().to_string());
    }
    if let Some(track_number) = payload.track_number {
        active.track_number = Set(Some(track_number));
    }
    if let Some(duration_ms) = payload.duration_ms {
        active.duration_ms = Set(Some(duration_ms));
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.db).await?;
    Ok(Json(updated))
}

pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let song = songs::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Song not found".to_string()))?;

    song.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
