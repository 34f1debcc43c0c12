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
    db::entities::artists,
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::ratings,
    state::AppState,
};

#[derive(Deserialize)]
pub struct ListArtistsQuery {
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
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub rating: ratings::RatingSummary,
}

#[derive(Serialize)]
pub struct PaginatedArtistsResponse {
    pub artists: Vec<artists::Model>,
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
pub struct CreateArtistRequest {
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ListArtistsQuery>,
) -> Result<Json<PaginatedArtistsResponse>> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 200);

    let mut select = artists::Entity::find();

    if let Some(search) = &query.search {
        if !search.is_empty() {
            select = select.filter(artists::Column::Name.contains(search));
        }
    }

    let total_items = select.clone().count(&state.db).await?;
    let total_pages = (total_items + page_size - 1) / page_size;

    let artists = select
        .order_by_asc(artists::Column::Name)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(&state.db)
        .await?;

    Ok(Json(PaginatedArtistsResponse {
        artists,
        pagination: PaginationInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    }))
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistResponse>> {
    let artist = artists::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

    let target = ContentRef::new(TargetKind::Artist, artist.id);
    let rating = ratings::cached_rating_summary(&state, &target).await?;

    Ok(Json(ArtistResponse {
        id: artist.id,
        name: artist.name,
        bio: artist.bio,
        image_url: artist.image_url,
        rating,
    }))
}

pub async fn create_artist(
    State(state): State<AppState>,
    Json(payload): Json<CreateArtistRequest>,
) -> Result<(StatusCode, Json<artists::Model>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Artist name must not be empty".to_string()));
    }

    let now = Utc::now().into();
    let artist = artists::ActiveModel {
        name: Set(name.to_string()),
        bio: Set(payload.bio),
        image_url: Set(payload.image_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = artist.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArtistRequest>,
) -> Result<Json<artists::Model>> {
    let artist = artists::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

    let mut active: artists::ActiveModel = artist.into();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Artist name must not be empty".to_string()));
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.db).await?;
    Ok(Json(updated))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let artist = artists::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

    artist.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
