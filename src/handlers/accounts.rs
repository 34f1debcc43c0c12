use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    services::accounts,
    state::AppState,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub id: i32,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let account = accounts::register_account(
        &state.db,
        &payload.username,
        &payload.password,
        payload.display_name,
    )
    .await?;

    let token =
        accounts::create_session(&state.db, account.id, state.config.session_ttl_hours).await?;
    let jar = jar.add(accounts::session_cookie(token));

    tracing::info!("Account {} registered", account.username);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AccountResponse {
            id: account.id,
            username: account.username,
            display_name: account.display_name,
            bio: account.bio,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let account = accounts::authenticate(&state.db, &payload.username, &payload.password).await?;

    let token =
        accounts::create_session(&state.db, account.id, state.config.session_ttl_hours).await?;
    let jar = jar.add(accounts::session_cookie(token));

    Ok((
        jar,
        Json(AccountResponse {
            id: account.id,
            username: account.username,
            display_name: account.display_name,
            bio: account.bio,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    accounts::delete_session(&state.db, &jar).await?;
    let jar = jar.add(accounts::clear_session_cookie());
    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AccountResponse>> {
    let account = accounts::require_account(&state.db, &jar).await?;
    Ok(Json(AccountResponse {
        id: account.id,
        username: account.username,
        display_name: account.display_name,
        bio: account.bio,
    }))
}
