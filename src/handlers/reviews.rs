use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::{accounts as account_entities, reviews},
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::{accounts, content},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub content: String,
    pub artist_id: Option<i32>,
    pub album_id: Option<i32>,
    pub song_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListReviewsQuery {
    pub kind: String,
    pub id: i32,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub content: String,
    pub verified: bool,
    pub author: Option<String>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct PaginatedReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: PaginationInfo,
}

#[derive(Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

fn target_condition(target: &ContentRef) -> sea_orm::sea_query::SimpleExpr {
    match target.kind {
        TargetKind::Artist => reviews::Column::ArtistId.eq(target.id),
        TargetKind::Album => reviews::Column::AlbumId.eq(target.id),
        TargetKind::Song => reviews::Column::SongId.eq(target.id),
    }
}

pub async fn create_review(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>)> {
    let target = ContentRef::from_ids(payload.artist_id, payload.album_id, payload.song_id)?;
    let text = payload.content.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Review content must not be empty".to_string()));
    }

    content::ensure_exists(&state.db, &target).await?;
    let account = accounts::current_account(&state.db, &jar).await?;

    let now = Utc::now().into();
    let review = reviews::ActiveModel {
        content: Set(text.to_string()),
        verified: Set(account.is_some()),
        account_id: Set(account.as_ref().map(|a| a.id)),
        artist_id: Set(target.artist_id()),
        album_id: Set(target.album_id()),
        song_id: Set(target.song_id()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = review.insert(&state.db).await?;
    let author = account.map(|a| a.display_name.unwrap_or(a.username));

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            id: created.id,
            content: created.content,
            verified: created.verified,
            author,
            created_at: created.created_at.to_rfc3339(),
        }),
    ))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> Result<Json<PaginatedReviewsResponse>> {
    let target = ContentRef::from_kind_str(&query.kind, query.id)?;
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);

    let select = reviews::Entity::find().filter(target_condition(&target));

    let total_items = select.clone().count(&state.db).await?;
    let total_pages = (total_items + page_size - 1) / page_size;

    let reviews = select
        .order_by_desc(reviews::Column::CreatedAt)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .find_also_related(account_entities::Entity)
        .all(&state.db)
        .await?;

    let reviews: Vec<ReviewResponse> = reviews
        .into_iter()
        .map(|(review, account)| ReviewResponse {
            id: review.id,
            content: review.content,
            verified: review.verified,
            author: account.map(|a| a.display_name.unwrap_or(a.username)),
            created_at: review.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(PaginatedReviewsResponse {
        reviews,
        pagination: PaginationInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    }))
}
