use uuid::Uuid;

use crate::database;
use crate::error::ApiError;
use crate::layout::{catalogs, resolve_layout, Catalogs, ProfileLayout, ResolvedLayout};

/// Parse a profile id path segment, keeping the error in the standard
/// envelope instead of axum's bare rejection text.
pub fn parse_profile_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid profile id: {}", raw)))
}

/// The layout a page should render for this profile: the stored document if
/// it still resolves, otherwise the starter. A stored document that stops
/// resolving (catalog override changed underneath it) degrades to the starter
/// with a warning rather than taking the page down.
pub async fn resolved_for(profile_id: Uuid) -> Result<ResolvedLayout, ApiError> {
    let cats = catalogs();

    match database::layouts::fetch(profile_id).await? {
        Some(record) => {
            let resolved = ProfileLayout::from_json(record.document)
                .and_then(|layout| resolve_layout(&layout, &cats.blocks, &cats.themes));
            match resolved {
                Ok(resolved) => Ok(resolved),
                Err(e) => {
                    tracing::warn!(
                        "Stored layout for {} no longer resolves ({}); serving starter",
                        profile_id,
                        e
                    );
                    starter_resolved(profile_id, cats)
                }
            }
        }
        None => starter_resolved(profile_id, cats),
    }
}

fn starter_resolved(profile_id: Uuid, cats: &Catalogs) -> Result<ResolvedLayout, ApiError> {
    let starter = ProfileLayout::starter(profile_id);
    resolve_layout(&starter, &cats.blocks, &cats.themes).map_err(|e| {
        // Only reachable when a catalog override breaks the starter blocks
        tracing::error!("Starter layout failed to resolve: {}", e);
        ApiError::internal_server_error("Default layout is unavailable")
    })
}
