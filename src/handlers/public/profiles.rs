use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::api::format;
use crate::database;
use crate::error::ApiError;

/// GET /api/profiles/:username - Public profile card by handle
pub async fn get(Path(username): Path<String>) -> Result<Json<Value>, ApiError> {
    let profile = database::profiles::fetch_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile '{}' not found", username)))?;

    let data = format::profile_to_api_value(&profile)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
