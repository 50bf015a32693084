use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::api::format;
use crate::database;
use crate::error::ApiError;
use crate::handlers::utils::resolved_for;

/// GET /api/pages/:username - Everything a page render needs in one fetch:
/// the public profile plus the fully resolved layout
pub async fn get(Path(username): Path<String>) -> Result<Json<Value>, ApiError> {
    let profile = database::profiles::fetch_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile '{}' not found", username)))?;

    let resolved = resolved_for(profile.id).await?;
    let data = format::page_document(&profile, &resolved)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
