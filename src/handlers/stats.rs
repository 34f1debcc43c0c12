use axum::{extract::State, Json};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::{
    db::entities::{accounts, albums, artists, ratings, reviews, songs},
    error::Result,
    state::AppState,
};

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_artists: u64,
    pub total_albums: u64,
    pub total_songs: u64,
    pub total_accounts: u64,
    pub total_ratings: u64,
    pub verified_ratings: u64,
    pub total_reviews: u64,
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let total_artists = artists::Entity::find().count(&state.db).await?;
    let total_albums = albums::Entity::find().count(&state.db).await?;
    let total_songs = songs::Entity::find().count(&state.db).await?;
    let total_accounts = accounts::Entity::find().count(&state.db).await?;
    let total_ratings = ratings::Entity::find().count(&state.db).await?;

    let verified_ratings = ratings::Entity::find()
        .filter(ratings::Column::Verified.eq(true))
        .count(&state.db)
        .await?;

    let total_reviews = reviews::Entity::find().count(&state.db).await?;

    Ok(Json(StatsResponse {
        total_artists,
        total_albums,
        total_songs,
        total_accounts,
        total_ratings,
        verified_ratings,
        total_reviews,
    }))
}
