use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::layout::catalogs;

/// GET /api/catalog/blocks - Block definitions: types, variants, defaults
pub async fn blocks() -> Result<Json<Value>, ApiError> {
    let data = serde_json::to_value(&catalogs().blocks)?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// GET /api/catalog/themes - Theme presets with their full color sets
pub async fn themes() -> Result<Json<Value>, ApiError> {
    let data = serde_json::to_value(&catalogs().themes)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
