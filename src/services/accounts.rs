use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};

use crate::db::entities::{accounts, sessions};
use crate::error::{AppError, Result};

pub const SESSION_COOKIE: &str = "tunescore_session";

/// Salted SHA-256 password hash, stored as `<b64 salt>$<b64 digest>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!(
        "{}${}",
        general_purpose::STANDARD.encode(salt),
        general_purpose::STANDARD.encode(digest)
    )
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (
        general_purpose::STANDARD.decode(salt_b64),
        general_purpose::STANDARD.decode(digest_b64),
    ) else {
        return false;
    };
    salted_digest(&salt, password) == expected
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub async fn register_account(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    display_name: Option<String>,
) -> Result<accounts::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username must not be empty".to_string()));
    }
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let existing = accounts::Entity::find()
        .filter(accounts::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("Username is already taken".to_string()));
    }

    let now = Utc::now().into();
    let account = accounts::ActiveModel {
        username: Set(username.to_string()),
        display_name: Set(display_name),
        bio: Set(None),
        password_hash: Set(hash_password(password)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(account.insert(db).await?)
}

pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<accounts::Model> {
    let account = accounts::Entity::find()
        .filter(accounts::Column::Username.eq(username.trim()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

    if !verify_password(password, &account.password_hash) {
        return Err(AppError::Authentication(
            "Invalid username or password".to_string(),
        ));
    }

    Ok(account)
}

/// Create a session row and return its token.
pub async fn create_session(
    db: &DatabaseConnection,
    account_id: i32,
    ttl_hours: i64,
) -> Result<String> {
    let token = generate_token();
    let now = Utc::now();
    let session = sessions::ActiveModel {
        token: Set(token.clone()),
        account_id: Set(account_id),
        expires_at: Set((now + Duration::hours(ttl_hours)).into()),
        created_at: Set(now.into()),
        ..Default::default()
    };
    session.insert(db).await?;
    Ok(token)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Resolve the account for the request's session cookie, if any.
/// Expired or unknown tokens resolve to None rather than an error.
pub async fn current_account(
    db: &DatabaseConnection,
    jar: &CookieJar,
) -> Result<Option<accounts::Model>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let session = sessions::Entity::find()
        .filter(sessions::Column::Token.eq(cookie.value()))
        .one(db)
        .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.expires_at.to_utc() <= Utc::now() {
        // Lazy cleanup of the dead session
        session.delete(db).await?;
        return Ok(None);
    }

    let account = accounts::Entity::find_by_id(session.account_id)
        .one(db)
        .await?;
    Ok(account)
}

/// Require a logged-in account; 401 otherwise.
pub async fn require_account(
    db: &DatabaseConnection,
    jar: &CookieJar,
) -> Result<accounts::Model> {
    current_account(db, jar)
        .await?
        .ok_or_else(|| AppError::Authentication("Login required".to_string()))
}

pub async fn delete_session(db: &DatabaseConnection, jar: &CookieJar) -> Result<()> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(cookie.value()))
            .exec(db)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password");
        let b = hash_password("same password");
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", "bad base64$also bad"));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
