use uuid::Uuid;

use crate::database::manager::{unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::profile::{Profile, UpdateProfile};

/// Look up a profile by its public handle
pub async fn fetch_by_username(username: &str) -> Result<Option<Profile>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, user_id, username, display_name, bio, avatar_url, banner_url, status,
         links, favorite_games, created_at, updated_at
         FROM profiles
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&pool)
    .await?;

    Ok(profile)
}

/// Look up a profile by id
pub async fn fetch_by_id(profile_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, user_id, username, display_name, bio, avatar_url, banner_url, status,
         links, favorite_games, created_at, updated_at
         FROM profiles
         WHERE id = $1",
    )
    .bind(profile_id)
    .fetch_optional(&pool)
    .await?;

    Ok(profile)
}

/// Apply a partial update and return the fresh row, or None when the profile
/// does not exist. A username collision maps to a conflict error.
pub async fn update(profile_id: Uuid, changes: &UpdateProfile) -> Result<Option<Profile>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET
             username = COALESCE($2, username),
             display_name = COALESCE($3, display_name),
             bio = COALESCE($4, bio),
             avatar_url = COALESCE($5, avatar_url),
             banner_url = COALESCE($6, banner_url),
             status = COALESCE($7, status),
             links = COALESCE($8, links),
             favorite_games = COALESCE($9, favorite_games),
             updated_at = now()
         WHERE id = $1
         RETURNING id, user_id, username, display_name, bio, avatar_url, banner_url, status,
         links, favorite_games, created_at, updated_at",
    )
    .bind(profile_id)
    .bind(&changes.username)
    .bind(&changes.display_name)
    .bind(&changes.bio)
    .bind(&changes.avatar_url)
    .bind(&changes.banner_url)
    .bind(&changes.status)
    .bind(changes.links.as_ref().map(sqlx::types::Json))
    .bind(changes.favorite_games.as_ref().map(sqlx::types::Json))
    .fetch_optional(&pool)
    .await
    .map_err(|e| unique_violation(e, "Username is already taken"))?;

    Ok(profile)
}
