use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use maud::Markup;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use crate::{
    db::entities::{accounts as account_entities, albums, artists, comments, favorites, ratings, reviews, songs},
    db::enums::{ContentRef, TargetKind},
    error::{AppError, Result},
    services::{self, accounts},
    state::AppState,
    templates::{components, pages},
};

const GRID_PAGE_SIZE: u64 = 20;

fn format_timestamp(ts: &sea_orm::prelude::DateTimeWithTimeZone) -> String {
    ts.format("%b %e, %Y").to_string()
}

fn album_card_data(album: albums::Model, artist_name: String) -> components::AlbumCardData {
    components::AlbumCardData {
        id: album.id,
        title: album.title,
        artist_id: album.artist_id,
        artist_name,
        cover_art_url: album.cover_art_url,
        release_date: album.release_date.map(|d| d.to_string()),
    }
}

async fn load_reviews(
    state: &AppState,
    target: &ContentRef,
) -> Result<Vec<components::ReviewItemData>> {
    let condition = match target.kind {
        TargetKind::Artist => reviews::Column::ArtistId.eq(target.id),
        TargetKind::Album => reviews::Column::AlbumId.eq(target.id),
        TargetKind::Song => reviews::Column::SongId.eq(target.id),
    };

    let rows = reviews::Entity::find()
        .filter(condition)
        .order_by_desc(reviews::Column::CreatedAt)
        .find_also_related(account_entities::Entity)
        .all(&state.db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(review, account)| components::ReviewItemData {
            content: review.content,
            verified: review.verified,
            author: account.map(|a| a.display_name.unwrap_or(a.username)),
            created_at: format_timestamp(&review.created_at),
        })
        .collect())
}

async fn load_comments(
    state: &AppState,
    target: &ContentRef,
) -> Result<Vec<components::CommentItemData>> {
    let condition = match target.kind {
        TargetKind::Artist => comments::Column::ArtistId.eq(target.id),
        TargetKind::Album => comments::Column::AlbumId.eq(target.id),
        TargetKind::Song => comments::Column::SongId.eq(target.id),
    };

    let rows = comments::Entity::find()
        .filter(condition)
        .order_by_desc(comments::Column::CreatedAt)
        .find_also_related(account_entities::Entity)
        .all(&state.db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(comment, account)| components::CommentItemData {
            content: comment.content,
            author: account.map(|a| a.display_name.unwrap_or(a.username)),
            created_at: format_timestamp(&comment.created_at),
        })
        .collect())
}

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Markup> {
    let account = accounts::current_account(&state.db, &jar).await?;

    let recent_albums = albums::Entity::find()
        .order_by_desc(albums::Column::CreatedAt)
        .limit(10)
        .find_also_related(artists::Entity)
        .all(&state.db)
        .await?;

    let recent_albums: Vec<components::AlbumCardData> = recent_albums
        .into_iter()
        .map(|(album, artist)| {
            let artist_name = artist.map(|a| a.name).unwrap_or_default();
            album_card_data(album, artist_name)
        })
        .collect();

    let recent_reviews = reviews::Entity::find()
        .order_by_desc(reviews::Column::CreatedAt)
        .limit(5)
        .find_also_related(account_entities::Entity)
        .all(&state.db)
        .await?;

    let recent_reviews: Vec<components::ReviewItemData> = recent_reviews
        .into_iter()
        .map(|(review, author)| components::ReviewItemData {
            content: review.content,
            verified: review.verified,
            author: author.map(|a| a.display_name.unwrap_or(a.username)),
            created_at: format_timestamp(&review.created_at),
        })
        .collect();

    Ok(pages::home_page(
        account.is_some(),
        &recent_albums,
        &recent_reviews,
    ))
}

pub async fn artists(State(state): State<AppState>, jar: CookieJar) -> Result<Markup> {
    let account = accounts::current_account(&state.db, &jar).await?;
    Ok(pages::artists_page(account.is_some()))
}

#[derive(Deserialize)]
pub struct ArtistGridQuery {
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

pub async fn artists_grid(
    State(state): State<AppState>,
    Query(query): Query<ArtistGridQuery>,
) -> Result<Markup> {
    let page = query.page.max(1);

    let mut select = artists::Entity::find();
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        select = select.filter(artists::Column::Name.contains(search.trim()));
    }

    let total_items = select.clone().count(&state.db).await?;
    let total_pages = (total_items + GRID_PAGE_SIZE - 1) / GRID_PAGE_SIZE;

    let artists = select
        .order_by_asc(artists::Column::Name)
        .offset((page - 1) * GRID_PAGE_SIZE)
        .limit(GRID_PAGE_SIZE)
        .all(&state.db)
        .await?;

    let cards: Vec<components::ArtistCardData> = artists
        .into_iter()
        .map(|artist| components::ArtistCardData {
            id: artist.id,
            name: artist.name,
            image_url: artist.image_url,
        })
        .collect();

    Ok(pages::artist_grid_partial(
        &cards,
        page,
        total_pages,
        query.search.as_deref(),
    ))
}

async fn detail_context<'a>(
    state: &AppState,
    jar: &CookieJar,
    target: ContentRef,
    summary: &'a services::RatingSummary,
    reviews: &'a [components::ReviewItemData],
    comments: &'a [components::CommentItemData],
) -> Result<pages::DetailContext<'a>> {
    let account = accounts::current_account(&state.db, jar).await?;
    let favorited = match &account {
        Some(account) => {
            crate::handlers::favorites::is_favorited(state, account.id, &target).await?
        }
        None => false,
    };

    Ok(pages::DetailContext {
        logged_in: account.is_some(),
        target,
        summary,
        favorited,
        reviews,
        comments,
    })
}

pub async fn artist_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Markup> {
    let artist = artists::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artist {} not found", id)))?;

    let albums = albums::Entity::find()
        .filter(albums::Column::ArtistId.eq(artist.id))
        .order_by_desc(albums::Column::ReleaseDate)
        .all(&state.db)
        .await?;
    let album_cards: Vec<components::AlbumCardData> = albums
        .into_iter()
        .map(|album| album_card_data(album, artist.name.clone()))
        .collect();

    let target = ContentRef {
        kind: TargetKind::Artist,
        id: artist.id,
    };
    let summary = services::ratings::cached_rating_summary(&state, &target).await?;
    let reviews = load_reviews(&state, &target).await?;
    let comments = load_comments(&state, &target).await?;
    let ctx = detail_context(&state, &jar, target, &summary, &reviews, &comments).await?;

    Ok(pages::artist_detail_page(
        &pages::ArtistDetailData {
            name: &artist.name,
            bio: artist.bio.as_deref(),
            image_url: artist.image_url.as_deref(),
            albums: &album_cards,
        },
        &ctx,
    ))
}

pub async fn album_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Markup> {
    let (album, artist) = albums::Entity::find_by_id(id)
        .find_also_related(artists::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("album {} not found", id)))?;
    let artist_name = artist.map(|a| a.name).unwrap_or_default();

    let songs = songs::Entity::find()
        .filter(songs::Column::AlbumId.eq(album.id))
        .order_by_asc(songs::Column::TrackNumber)
        .all(&state.db)
        .await?;
    let song_rows: Vec<components::SongRowData> = songs
        .into_iter()
        .map(|song| components::SongRowData {
            id: song.id,
            title: song.title,
            track_number: song.track_number,
            duration_ms: song.duration_ms,
        })
        .collect();

    let target = ContentRef {
        kind: TargetKind::Album,
        id: album.id,
    };
    let summary = services::ratings::cached_rating_summary(&state, &target).await?;
    let reviews = load_reviews(&state, &target).await?;
    let comments = load_comments(&state, &target).await?;
    let ctx = detail_context(&state, &jar, target, &summary, &reviews, &comments).await?;

    let release_date = album.release_date.map(|d| d.to_string());
    Ok(pages::album_detail_page(
        &pages::AlbumDetailData {
            title: &album.title,
            artist_id: album.artist_id,
            artist_name: &artist_name,
            cover_art_url: album.cover_art_url.as_deref(),
            release_date: release_date.as_deref(),
            songs: &song_rows,
        },
        &ctx,
    ))
}

pub async fn song_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Markup> {
    let song = songs::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("song {} not found", id)))?;

    let album = albums::Entity::find_by_id(song.album_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("album {} not found", song.album_id)))?;
    let artist = artists::Entity::find_by_id(song.artist_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artist {} not found", song.artist_id)))?;

    let target = ContentRef {
        kind: TargetKind::Song,
        id: song.id,
    };
    let summary = services::ratings::cached_rating_summary(&state, &target).await?;
    let reviews = load_reviews(&state, &target).await?;
    let comments = load_comments(&state, &target).await?;
    let ctx = detail_context(&state, &jar, target, &summary, &reviews, &comments).await?;

    Ok(pages::song_detail_page(
        &pages::SongDetailData {
            title: &song.title,
            album_id: album.id,
            album_title: &album.title,
            artist_id: artist.id,
            artist_name: &artist.name,
            track_number: song.track_number,
            duration_ms: song.duration_ms,
        },
        &ctx,
    ))
}

pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Markup> {
    let viewer = accounts::current_account(&state.db, &jar).await?;

    let account = account_entities::Entity::find()
        .filter(account_entities::Column::Username.eq(username.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {} not found", username)))?;

    let rating_count = ratings::Entity::find()
        .filter(ratings::Column::AccountId.eq(account.id))
        .count(&state.db)
        .await?;
    let review_count = reviews::Entity::find()
        .filter(reviews::Column::AccountId.eq(account.id))
        .count(&state.db)
        .await?;

    let favorite_rows = favorites::Entity::find()
        .filter(favorites::Column::AccountId.eq(account.id))
        .order_by_desc(favorites::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut favorite_links: Vec<(String, String)> = Vec::new();
    for favorite in favorite_rows {
        let Ok(target) =
            ContentRef::from_ids(favorite.artist_id, favorite.album_id, favorite.song_id)
        else {
            continue;
        };
        let entry = match target.kind {
            TargetKind::Artist => artists::Entity::find_by_id(target.id)
                .one(&state.db)
                .await?
                .map(|a| (a.name, format!("/artists/{}", a.id))),
            TargetKind::Album => albums::Entity::find_by_id(target.id)
                .one(&state.db)
                .await?
                .map(|a| (a.title, format!("/albums/{}", a.id))),
            TargetKind::Song => songs::Entity::find_by_id(target.id)
                .one(&state.db)
                .await?
                .map(|s| (s.title, format!("/songs/{}", s.id))),
        };
        if let Some(entry) = entry {
            favorite_links.push(entry);
        }
    }

    let review_rows = reviews::Entity::find()
        .filter(reviews::Column::AccountId.eq(account.id))
        .order_by_desc(reviews::Column::CreatedAt)
        .limit(20)
        .all(&state.db)
        .await?;
    let review_items: Vec<components::ReviewItemData> = review_rows
        .into_iter()
        .map(|review| components::ReviewItemData {
            content: review.content,
            verified: review.verified,
            author: None,
            created_at: format_timestamp(&review.created_at),
        })
        .collect();

    Ok(pages::profile_page(
        viewer.is_some(),
        &pages::ProfileData {
            username: &account.username,
            display_name: account.display_name.as_deref(),
            bio: account.bio.as_deref(),
            rating_count,
            review_count,
            favorites: &favorite_links,
            reviews: &review_items,
        },
    ))
}

#[derive(Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Markup {
    pages::login_page(query.error.as_deref())
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    match accounts::authenticate(&state.db, &form.username, &form.password).await {
        Ok(account) => {
            let token = accounts::create_session(
                &state.db,
                account.id,
                state.config.session_ttl_hours,
            )
            .await?;
            let jar = jar.add(accounts::session_cookie(token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AppError::Authentication(message)) => {
            Ok(pages::login_page(Some(&message)).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn register_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    match accounts::register_account(&state.db, &form.username, &form.password, None).await {
        Ok(account) => {
            let token = accounts::create_session(
                &state.db,
                account.id,
                state.config.session_ttl_hours,
            )
            .await?;
            let jar = jar.add(accounts::session_cookie(token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AppError::Validation(message)) => {
            Ok(pages::login_page(Some(&message)).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn logout_submit(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    accounts::delete_session(&state.db, &jar).await?;
    let jar = jar.add(accounts::clear_session_cookie());
    Ok((jar, Redirect::to("/")))
}

#[derive(Deserialize)]
pub struct TargetForm {
    pub kind: String,
    pub id: i32,
}

#[derive(Deserialize)]
pub struct RatingForm {
    pub kind: String,
    pub id: i32,
    pub value: i32,
}

/// HTMX rating submission; responds with the refreshed summary panel.
pub async fn rating_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RatingForm>,
) -> Result<Markup> {
    let target = ContentRef::from_kind_str(&form.kind, form.id)?;
    let account = accounts::current_account(&state.db, &jar).await?;
    services::ratings::submit_rating(&state, &target, form.value, account.as_ref()).await?;

    let summary = services::ratings::cached_rating_summary(&state, &target).await?;
    Ok(components::rating_summary_panel(&target, &summary))
}

#[derive(Deserialize)]
pub struct ContentForm {
    pub kind: String,
    pub id: i32,
    pub content: String,
}

/// HTMX review submission; responds with the refreshed review list.
pub async fn review_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ContentForm>,
) -> Result<Markup> {
    let target = ContentRef::from_kind_str(&form.kind, form.id)?;
    let text = form.content.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Review content must not be empty".to_string(),
        ));
    }

    services::content::ensure_exists(&state.db, &target).await?;
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
    review.insert(&state.db).await?;

    let items = load_reviews(&state, &target).await?;
    Ok(components::review_list(&target, &items))
}

/// HTMX comment submission; responds with the refreshed comment list.
pub async fn comment_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ContentForm>,
) -> Result<Markup> {
    let target = ContentRef::from_kind_str(&form.kind, form.id)?;
    let text = form.content.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }

    services::content::ensure_exists(&state.db, &target).await?;
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
    comment.insert(&state.db).await?;

    let items = load_comments(&state, &target).await?;
    Ok(components::comment_list(&target, &items))
}

/// HTMX favorite toggle; responds with the refreshed button.
pub async fn favorite_toggle_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TargetForm>,
) -> Result<Markup> {
    let target = ContentRef::from_kind_str(&form.kind, form.id)?;
    let account = accounts::require_account(&state.db, &jar).await?;
    services::content::ensure_exists(&state.db, &target).await?;

    let existing = favorites::Entity::find()
        .filter(favorites::Column::AccountId.eq(account.id))
        .filter(match target.kind {
            TargetKind::Artist => favorites::Column::ArtistId.eq(target.id),
            TargetKind::Album => favorites::Column::AlbumId.eq(target.id),
            TargetKind::Song => favorites::Column::SongId.eq(target.id),
        })
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

    Ok(components::favorite_button(&target, favorited, true))
}
