use std::collections::HashMap;

use axum::{extract::Path, response::Json, Extension};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::format;
use crate::config;
use crate::database;
use crate::error::ApiError;
use crate::handlers::utils::parse_profile_id;
use crate::layout::{catalogs, reorder_blocks, validate_layout, ProfileLayout};
use crate::middleware::{ensure_owner, AuthUser};

/// GET /api/layouts/:profile_id - The owner's stored layout document. Falls
/// back to the starter document (stored: false) when nothing has been saved.
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile_id = parse_profile_id(&profile_id)?;
    ensure_owner(&user, profile_id)?;

    let data = match database::layouts::fetch(profile_id).await? {
        Some(record) => format::layout_to_api_value(&record),
        None => {
            let starter = ProfileLayout::starter(profile_id);
            let document = serde_json::to_value(&starter)?;
            json!({
                "document": document,
                "checksum": format::document_checksum(&document),
                "updated_at": starter.updated_at.to_rfc3339(),
                "stored": false,
            })
        }
    };

    Ok(Json(json!({ "success": true, "data": data })))
}

/// PUT /api/layouts/:profile_id - Validate and save a layout document.
/// The whole document is replaced on every save; nothing merges. The save is
/// rejected before anything touches the database if the draft fails any
/// check, so a stored layout is always valid at write time.
pub async fn put(
    Extension(user): Extension<AuthUser>,
    Path(profile_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let profile_id = parse_profile_id(&profile_id)?;
    ensure_owner(&user, profile_id)?;

    if !payload.is_object() {
        return Err(ApiError::invalid_json("Layout document must be a JSON object"));
    }

    let mut layout = ProfileLayout::from_json(payload)?;
    if layout.profile_id != profile_id {
        return Err(ApiError::bad_request("Document profile_id does not match the URL"));
    }

    let limits = &config::config().layout;
    if layout.blocks.len() > limits.max_blocks {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "blocks".to_string(),
            format!("a layout can hold at most {} blocks", limits.max_blocks),
        );
        return Err(ApiError::validation_error("Too many blocks", Some(field_errors)));
    }

    let cats = catalogs();
    validate_layout(&layout, &cats.blocks, &cats.themes)?;

    // The server owns the timestamp; whatever the client sent is replaced
    layout.updated_at = Utc::now();

    // The profile row must exist before the layout can reference it
    if database::profiles::fetch_by_id(profile_id).await?.is_none() {
        return Err(ApiError::not_found("Profile not found"));
    }

    let document = serde_json::to_value(&layout)?;
    let encoded_len = document.to_string().len();
    if encoded_len > limits.max_document_bytes {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "document".to_string(),
            format!(
                "document is {} bytes; the limit is {}",
                encoded_len, limits.max_document_bytes
            ),
        );
        return Err(ApiError::validation_error("Layout document too large", Some(field_errors)));
    }

    let checksum = format::document_checksum(&document);
    let record = database::layouts::replace(profile_id, &document, &checksum, layout.updated_at).await?;

    Ok(Json(json!({ "success": true, "data": format::layout_to_api_value(&record) })))
}

/// DELETE /api/layouts/:profile_id - Drop the stored document so the page
/// goes back to the starter layout
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile_id = parse_profile_id(&profile_id)?;
    ensure_owner(&user, profile_id)?;

    let deleted = database::layouts::delete(profile_id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": deleted } })))
}

/// POST /api/layouts/:profile_id/reorder - Rearrange the stored blocks.
/// The body's `order` must list every current block id exactly once.
pub async fn reorder(
    Extension(user): Extension<AuthUser>,
    Path(profile_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let profile_id = parse_profile_id(&profile_id)?;
    ensure_owner(&user, profile_id)?;

    let order = payload
        .get("order")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("Body must include an 'order' array of block ids"))?;
    let order: Vec<String> = order
        .iter()
        .map(|id| {
            id.as_str()
                .map(String::from)
                .ok_or_else(|| ApiError::bad_request("Block ids in 'order' must be strings"))
        })
        .collect::<Result<_, _>>()?;

    let record = database::layouts::fetch(profile_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No stored layout to reorder"))?;

    let mut layout = ProfileLayout::from_json(record.document).map_err(|e| {
        tracing::warn!("Stored layout for {} failed to parse: {}", profile_id, e);
        ApiError::internal_server_error("Stored layout is corrupted")
    })?;

    reorder_blocks(&mut layout, &order)?;
    layout.updated_at = Utc::now();

    let document = serde_json::to_value(&layout)?;
    let checksum = format::document_checksum(&document);
    let record = database::layouts::replace(profile_id, &document, &checksum, layout.updated_at).await?;

    Ok(Json(json!({ "success": true, "data": format::layout_to_api_value(&record) })))
}
