use axum::{extract::Query, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::integrations;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 25;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term
    pub q: String,
    /// Result cap, clamped to 1..=25
    pub limit: Option<u32>,
}

impl SearchQuery {
    fn term(&self) -> Result<&str, ApiError> {
        let term = self.q.trim();
        if term.is_empty() {
            return Err(ApiError::bad_request("Query parameter 'q' is required"));
        }
        Ok(term)
    }

    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// GET /api/integrations/music/search?q= - Track search for the music block
/// editor. 503 when the provider is unconfigured, 502 when it misbehaves.
pub async fn music_search(Query(query): Query<SearchQuery>) -> Result<Json<Value>, ApiError> {
    let tracks = integrations::music::search_tracks(query.term()?, query.limit()).await?;
    let data = serde_json::to_value(tracks)?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// GET /api/integrations/games/search?q= - Game search for the games block
/// editor
pub async fn games_search(Query(query): Query<SearchQuery>) -> Result<Json<Value>, ApiError> {
    let games = integrations::games::search_games(query.term()?, query.limit()).await?;
    let data = serde_json::to_value(games)?;
    Ok(Json(json!({ "success": true, "data": data })))
}
