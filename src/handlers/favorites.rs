use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::favorites,
    db::enums::{ContentRef, TargetKind},
    error::Result,
    services::{accounts, content},
    state::AppState,
};

#[derive(Deserialize)]
pub struct ToggleFavoriteRequest {
    pub artist_id: Option<i32>,
    pub album_id: Option<i32>,
    pub song_id: Option<i32>,
}

#[derive(Serialize)]
pub struct ToggleFavoriteResponse {
    pub favorited: bool,
}

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub id: i32,
    pub kind: String,
    pub target_id: i32,
    pub created_at: String,
}

fn target_condition(target: &ContentRef) -> sea_orm::sea_query::SimpleExpr {
    match target.kind {
        TargetKind::Artist => favorites::Column::ArtistId.eq(target.id),
        TargetKind::Album => favorites::Column::AlbumId.eq(target.id),
        TargetKind::Song => favorites::Column::SongId.eq(target.id),
    }
}

/// Toggle a favorite for the logged-in account. Favoriting twice removes
/// the favorite again.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let target = ContentRef::from_ids(payload.artist_id, payload.album_id, payload.song_id)?;
    let account = accounts::require_account(&state.db, &jar).await?;
    content::ensure_exists(&state.db, &target).await?;

    let existing = favorites::Entity::find()
        .filter(favorites::Column::AccountId.eq(account.id))
        .filter(target_condition(&target))
        .one(&state.db)
        .await?;

    let favorited = match existing {
        Some(favorite) => {
            favorite.delete(&state.db).await?;
            false
        }
        None => {
            let favorite = favorites::ActiveModel {
                account_id: Set(account.id),
                artist_id: Set(target.artist_id()),
                album_id: Set(target.album_id()),
                song_id: Set(target.song_id()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            favorite.insert(&state.db).await?;
            true
        }
    };

    Ok(Json(ToggleFavoriteResponse { favorited }))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<FavoriteResponse>>> {
    let account = accounts::require_account(&state.db, &jar).await?;

    let favorites = favorites::Entity::find()
        .filter(favorites::Column::AccountId.eq(account.id))
        .order_by_desc(favorites::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let favorites: Vec<FavoriteResponse> = favorites
        .into_iter()
        .filter_map(|favorite| {
            let target =
                ContentRef::from_ids(favorite.artist_id, favorite.album_id, favorite.song_id)
                    .ok()?;
            Some(FavoriteResponse {
                id: favorite.id,
                kind: target.kind.as_str().to_string(),
                target_id: target.id,
                created_at: favorite.created_at.to_rfc3339(),
            })
        })
        .collect();

    Ok(Json(favorites))
}

/// Whether the account currently favorites the target (used by the HTML
/// favorite button partial).
pub async fn is_favorited(
    state: &AppState,
    account_id: i32,
    target: &ContentRef,
) -> Result<bool> {
    let existing = favorites::Entity::find()
        .filter(favorites::Column::AccountId.eq(account_id))
        .filter(target_condition(target))
        .one(&state.db)
        .await?;
    Ok(existing.is_some())
}
