use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{accounts, ratings};
use crate::db::enums::{ContentRef, TargetKind};
use crate::error::{AppError, Result};
use crate::services::{cache::CacheService, content};
use crate::state::AppState;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

/// Aggregated rating figures for one content entity, with verified
/// (authenticated) and unverified (anonymous) pools averaged separately.
/// An empty pool yields a `None` average, serialized as JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub verified_average: Option<f64>,
    pub verified_count: u64,
    pub unverified_average: Option<f64>,
    pub unverified_count: u64,
}

impl RatingSummary {
    pub fn total_count(&self) -> u64 {
        self.verified_count + self.unverified_count
    }
}

fn target_condition(target: &ContentRef) -> sea_orm::sea_query::SimpleExpr {
    match target.kind {
        TargetKind::Artist => ratings::Column::ArtistId.eq(target.id),
        TargetKind::Album => ratings::Column::AlbumId.eq(target.id),
        TargetKind::Song => ratings::Column::SongId.eq(target.id),
    }
}

/// Arithmetic mean over each pool.
pub fn summarize(values: &[(i32, bool)]) -> RatingSummary {
    let mut verified_sum: i64 = 0;
    let mut verified_count: u64 = 0;
    let mut unverified_sum: i64 = 0;
    let mut unverified_count: u64 = 0;

    for &(value, verified) in values {
        if verified {
            verified_sum += value as i64;
            verified_count += 1;
        } else {
            unverified_sum += value as i64;
            unverified_count += 1;
        }
    }

    let mean = |sum: i64, count: u64| {
        if count == 0 {
            None
        } else {
            Some(sum as f64 / count as f64)
        }
    };

    RatingSummary {
        verified_average: mean(verified_sum, verified_count),
        verified_count,
        unverified_average: mean(unverified_sum, unverified_count),
        unverified_count,
    }
}

/// Compute the summary for a target straight from the database.
pub async fn rating_summary(
    db: &DatabaseConnection,
    target: &ContentRef,
) -> Result<RatingSummary> {
    let values: Vec<(i32, bool)> = ratings::Entity::find()
        .filter(target_condition(target))
        .select_only()
        .column(ratings::Column::Value)
        .column(ratings::Column::Verified)
        .into_tuple()
        .all(db)
        .await?;

    Ok(summarize(&values))
}

/// Cached summary lookup; computes and stores on miss.
pub async fn cached_rating_summary(
    state: &AppState,
    target: &ContentRef,
) -> Result<RatingSummary> {
    let key = CacheService::rating_summary_key(target);

    if let Some(summary) = state.cache.get::<RatingSummary>(&key)? {
        return Ok(summary);
    }

    let summary = rating_summary(&state.db, target).await?;
    state.cache.set(&key, &summary, None)?;
    Ok(summary)
}

/// Submit a rating for a target. A verified submission replaces the
/// account's previous rating on the same target; anonymous submissions
/// always insert. The target's cached summary is invalidated.
pub async fn submit_rating(
    state: &AppState,
    target: &ContentRef,
    value: i32,
    account: Option<&accounts::Model>,
) -> Result<ratings::Model> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(AppError::Validation(format!(
            "Rating value must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    content::ensure_exists(&state.db, target).await?;

    let now = Utc::now().into();
    let model = if let Some(account) = account {
        let existing = ratings::Entity::find()
            .filter(target_condition(target))
            .filter(ratings::Column::AccountId.eq(account.id))
            .one(&state.db)
            .await?;

        match existing {
            Some(rating) => {
                let mut active: ratings::ActiveModel = rating.into();
                active.value = Set(value);
                active.updated_at = Set(now);
                active.update(&state.db).await?
            }
            None => {
                let rating = ratings::ActiveModel {
                    value: Set(value),
                    verified: Set(true),
                    account_id: Set(Some(account.id)),
                    artist_id: Set(target.artist_id()),
                    album_id: Set(target.album_id()),
                    song_id: Set(target.song_id()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                rating.insert(&state.db).await?
            }
        }
    } else {
        let rating = ratings::ActiveModel {
            value: Set(value),
            verified: Set(false),
            account_id: Set(None),
            artist_id: Set(target.artist_id()),
            album_id: Set(target.album_id()),
            song_id: Set(target.song_id()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        rating.insert(&state.db).await?
    };

    state
        .cache
        .invalidate(&CacheService::rating_summary_key(target));

    tracing::debug!(
        "Rating {} recorded for {} {}",
        model.value,
        target.kind.as_str(),
        target.id
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_summarize_empty_is_null() {
        let summary = summarize(&[]);
        assert_eq!(summary.verified_average, None);
        assert_eq!(summary.unverified_average, None);
        assert_eq!(summary.total_count(), 0);
    }

    #[test]
    fn test_summarize_arithmetic_mean() {
        let summary = summarize(&[(4, true), (6, true), (10, true)]);
        assert_eq!(summary.verified_average, Some(20.0 / 3.0));
        assert_eq!(summary.verified_count, 3);
        assert_eq!(summary.unverified_average, None);
    }

    #[test]
    fn test_summarize_splits_pools() {
        let summary = summarize(&[(10, true), (2, false), (4, false)]);
        assert_eq!(summary.verified_average, Some(10.0));
        assert_eq!(summary.verified_count, 1);
        assert_eq!(summary.unverified_average, Some(3.0));
        assert_eq!(summary.unverified_count, 2);
    }

    #[test]
    fn test_empty_pool_serializes_as_null() {
        let json = serde_json::to_value(summarize(&[(7, false)])).unwrap();
        assert!(json["verified_average"].is_null());
        assert_eq!(json["unverified_average"], 7.0);
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range() {
        let state = setup_test_app_state().await;
        let artist = create_test_artist(&state.db, "Test Artist").await;
        let target = ContentRef::new(TargetKind::Artist, artist.id);

        assert!(submit_rating(&state, &target, 0, None).await.is_err());
        assert!(submit_rating(&state, &target, 11, None).await.is_err());
        assert!(submit_rating(&state, &target, 10, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_target() {
        let state = setup_test_app_state().await;
        let target = ContentRef::new(TargetKind::Album, 999);

        let err = submit_rating(&state, &target, 5, None).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_verified_resubmission_replaces() {
        let state = setup_test_app_state().await;
        let artist = create_test_artist(&state.db, "Test Artist").await;
        let album = create_test_album(&state.db, artist.id, "Test Album").await;
        let account = create_test_account(&state.db, "alice").await;
        let target = ContentRef::new(TargetKind::Album, album.id);

        submit_rating(&state, &target, 3, Some(&account)).await.unwrap();
        submit_rating(&state, &target, 9, Some(&account)).await.unwrap();

        let summary = rating_summary(&state.db, &target).await.unwrap();
        assert_eq!(summary.verified_count, 1);
        assert_eq!(summary.verified_average, Some(9.0));
    }

    #[tokio::test]
    async fn test_anonymous_submissions_accumulate() {
        let state = setup_test_app_state().await;
        let artist = create_test_artist(&state.db, "Test Artist").await;
        let target = ContentRef::new(TargetKind::Artist, artist.id);

        submit_rating(&state, &target, 2, None).await.unwrap();
        submit_rating(&state, &target, 4, None).await.unwrap();

        let summary = rating_summary(&state.db, &target).await.unwrap();
        assert_eq!(summary.unverified_count, 2);
        assert_eq!(summary.unverified_average, Some(3.0));
    }

    #[tokio::test]
    async fn test_submit_invalidates_cached_summary() {
        let state = setup_test_app_state().await;
        let artist = create_test_artist(&state.db, "Test Artist").await;
        let target = ContentRef::new(TargetKind::Artist, artist.id);

        submit_rating(&state, &target, 6, None).await.unwrap();
        let before = cached_rating_summary(&state, &target).await.unwrap();
        assert_eq!(before.unverified_average, Some(6.0));

        submit_rating(&state, &target, 8, None).await.unwrap();
        let after = cached_rating_summary(&state, &target).await.unwrap();
        assert_eq!(after.unverified_average, Some(7.0));
    }
}
