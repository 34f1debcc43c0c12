use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::enums::ContentRef,
    error::Result,
    services::{accounts, ratings},
    state::AppState,
};

#[derive(Deserialize)]
pub struct SubmitRatingRequest {
    pub value: i32,
    pub artist_id: Option<i32>,
    pub album_id: Option<i32>,
    pub song_id: Option<i32>,
}

#[derive(Serialize)]
pub struct SubmitRatingResponse {
    pub id: i32,
    pub value: i32,
    pub verified: bool,
    pub summary: ratings::RatingSummary,
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub kind: String,
    pub id: i32,
}

pub async fn submit_rating(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SubmitRatingRequest>,
) -> Result<(StatusCode, Json<SubmitRatingResponse>)> {
    let target = ContentRef::from_ids(payload.artist_id, payload.album_id, payload.song_id)?;
    let account = accounts::current_account(&state.db, &jar).await?;

    let rating =
        ratings::submit_rating(&state, &target, payload.value, account.as_ref()).await?;
    let summary = ratings::cached_rating_summary(&state, &target).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitRatingResponse {
            id: rating.id,
            value: rating.value,
            verified: rating.verified,
            summary,
        }),
    ))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ratings::RatingSummary>> {
    let target = ContentRef::from_kind_str(&query.kind, query.id)?;
    let summary = ratings::cached_rating_summary(&state, &target).await?;
    Ok(Json(summary))
}
