use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::database;
use crate::error::ApiError;
use crate::handlers::utils::{parse_profile_id, resolved_for};
use crate::layout::{catalogs, resolve_layout, validate_document};

/// POST /api/layouts/validate - Check a layout document without saving it.
/// Anonymous and stateless, so editors can validate as the user types.
pub async fn validate(Json(payload): Json<Value>) -> Result<Json<Value>, ApiError> {
    let cats = catalogs();
    let layout = validate_document(payload, &cats.blocks, &cats.themes)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "valid": true,
            "profile_id": layout.profile_id,
            "blocks": layout.blocks.len(),
        }
    })))
}

/// POST /api/layouts/preview - Validate and resolve a draft in one call,
/// returning exactly what a page render would receive
pub async fn preview(Json(payload): Json<Value>) -> Result<Json<Value>, ApiError> {
    let cats = catalogs();
    let layout = validate_document(payload, &cats.blocks, &cats.themes)?;
    let resolved = resolve_layout(&layout, &cats.blocks, &cats.themes)?;

    let data = serde_json::to_value(resolved)?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// GET /api/layouts/:profile_id/resolved - The layout a renderer should use
/// for this profile (stored document, or the starter when none is saved)
pub async fn resolved(Path(profile_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let profile_id = parse_profile_id(&profile_id)?;

    // 404 for unknown profiles, not an empty starter page
    if database::profiles::fetch_by_id(profile_id).await?.is_none() {
        return Err(ApiError::not_found("Profile not found"));
    }

    let resolved = resolved_for(profile_id).await?;
    let data = serde_json::to_value(resolved)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
