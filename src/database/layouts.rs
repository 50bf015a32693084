use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::layout::LayoutRecord;

/// Fetch the stored layout document for a profile, if one has been saved
pub async fn fetch(profile_id: Uuid) -> Result<Option<LayoutRecord>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let record = sqlx::query_as::<_, LayoutRecord>(
        "SELECT profile_id, document, checksum, updated_at
         FROM profile_layouts
         WHERE profile_id = $1",
    )
    .bind(profile_id)
    .fetch_optional(&pool)
    .await?;

    Ok(record)
}

/// Replace the whole layout document. Last write wins; there is no
/// version check on the stored row.
pub async fn replace(
    profile_id: Uuid,
    document: &Value,
    checksum: &str,
    updated_at: DateTime<Utc>,
) -> Result<LayoutRecord, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let record = sqlx::query_as::<_, LayoutRecord>(
        "INSERT INTO profile_layouts (profile_id, document, checksum, updated_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (profile_id) DO UPDATE
         SET document = EXCLUDED.document,
             checksum = EXCLUDED.checksum,
             updated_at = EXCLUDED.updated_at
         RETURNING profile_id, document, checksum, updated_at",
    )
    .bind(profile_id)
    .bind(document)
    .bind(checksum)
    .bind(updated_at)
    .fetch_one(&pool)
    .await?;

    Ok(record)
}

/// Drop the stored layout so the profile falls back to the starter document.
/// Returns false when there was nothing to delete.
pub async fn delete(profile_id: Uuid) -> Result<bool, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM profile_layouts WHERE profile_id = $1")
        .bind(profile_id)
        .execute(&pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
