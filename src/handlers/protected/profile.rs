use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::api::format;
use crate::config;
use crate::database;
use crate::database::models::profile::UpdateProfile;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// PUT /api/profile - Update the caller's own profile. The token names the
/// profile, so there is no id in the path and nothing to cross-check.
/// Partial update: absent fields keep their stored values.
pub async fn put(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let changes: UpdateProfile = serde_json::from_value(payload)
        .map_err(|e| ApiError::invalid_json(format!("Invalid profile update: {}", e)))?;
    changes.validate(&config::config().profile)?;

    let profile = database::profiles::update(user.profile_id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let data = format::profile_to_api_value(&profile)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
