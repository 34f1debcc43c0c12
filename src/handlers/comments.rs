use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::{accounts as account_entities, comments},
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::{accounts, content},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub artist_id: Option<i32>,
    pub album_id: Option<i32>,
    pub song_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListCommentsQuery {
    pub kind: String,
    pub id: i32,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub author: Option<String>,
    pub created_at: String,
}

fn target_condition(target: &ContentRef) -> sea_orm::sea_query::SimpleExpr {
    match target.kind {
        TargetKind::Artist => comments::Column::ArtistId.eq(target.id),
        TargetKind::Album => comments::Column::AlbumId.eq(target.id),
        TargetKind::Song => comments::Column::SongId.eq(target.id),
    }
}

pub async fn create_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let target = ContentRef::from_ids(payload.artist_id, payload.album_id, payload.song_id)?;
    let text = payload.content.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Comment content must not be empty".to_string()));
    }

    content::ensure_exists(&state.db, &target).await?;
    let account = accounts::current_account(&state.db, &jar).await?;

    let comment = comments::ActiveModel {
        content: Set(text.to_string()),
        account_id: Set(account.as_ref().map(|a| a.id)),
        artist_id: Set(target.artist_id()),
        album_id: Set(target.album_id()),
        song_id: Set(target.song_id()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let created = comment.insert(&state.db).await?;
    let author = account.map(|a| a.display_name.unwrap_or(a.username));

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            id: created.id,
            content: created.content,
            author,
            created_at: created.created_at.to_rfc3339(),
        }),
    ))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<Vec<CommentResponse>>> {
    let target = ContentRef::from_kind_str(&query.kind, query.id)?;

    let comments = comments::Entity::find()
        .filter(target_condition(&target))
        .order_by_desc(comments::Column::CreatedAt)
        .find_also_related(account_entities::Entity)
        .all(&state.db)
        .await?;

    let comments: Vec<CommentResponse> = comments
        .into_iter()
        .map(|(comment, account)| CommentResponse {
            id: comment.id,
            content: comment.content,
            author: account.map(|a| a.display_name.unwrap_or(a.username)),
            created_at: comment.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(comments))
}
