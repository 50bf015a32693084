use std::sync::OnceLock;

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{body_snippet, http_client, parse_token_response, IntegrationError, TokenCache, UPSTREAM_TIMEOUT};
use crate::config;

const PROVIDER: &str = "games";

/// One game search hit, normalized from the provider's wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub platforms: Vec<String>,
    pub first_release_year: Option<i32>,
}

fn token_cache() -> &'static TokenCache {
    static CACHE: OnceLock<TokenCache> = OnceLock::new();
    CACHE.get_or_init(TokenCache::new)
}

/// Search the games catalog by name.
///
/// The provider takes its query as a plain-text body (IGDB's Apicalypse
/// syntax) with the client id in a header next to the bearer token.
pub async fn search_games(query: &str, limit: u32) -> Result<Vec<Game>, IntegrationError> {
    let cfg = &config::config().integrations.games;
    let (client_id, client_secret) = match (&cfg.client_id, &cfg.client_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => return Err(IntegrationError::NotConfigured(PROVIDER)),
    };

    let token = match token_cache().get().await {
        Some(token) => token,
        None => fetch_token(&cfg.token_url, client_id, client_secret).await?,
    };

    let response = http_client()
        .post(format!("{}/games", cfg.api_url))
        .timeout(UPSTREAM_TIMEOUT)
        .header("Client-ID", client_id)
        .bearer_auth(token)
        .body(search_body(query, limit))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IntegrationError::Upstream {
            status: status.as_u16(),
            body: body_snippet(&body),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| IntegrationError::Decode(e.to_string()))?;
    Ok(parse_games(&body))
}

async fn fetch_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, IntegrationError> {
    let response = http_client()
        .post(token_url)
        .timeout(UPSTREAM_TIMEOUT)
        .query(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IntegrationError::Token(format!(
            "{} returned {}: {}",
            PROVIDER,
            status,
            body_snippet(&body)
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| IntegrationError::Decode(e.to_string()))?;
    let (token, expires_in) = parse_token_response(&body)?;
    token_cache().store(token.clone(), expires_in).await;
    Ok(token)
}

fn search_body(query: &str, limit: u32) -> String {
    // Double quotes would break out of the search string
    let query = query.replace('"', "");
    format!(
        "search \"{}\"; fields name,summary,cover.url,platforms.name,first_release_date; limit {};",
        query, limit
    )
}

/// Normalize a search response (a bare JSON array of games). Entries missing
/// required fields are skipped.
fn parse_games(body: &Value) -> Vec<Game> {
    let items = body.as_array().map(Vec::as_slice).unwrap_or_default();
    items.iter().filter_map(parse_game).collect()
}

fn parse_game(item: &Value) -> Option<Game> {
    let id = item.get("id")?.as_i64()?;
    let name = item.get("name")?.as_str()?.to_string();

    let platforms = item
        .get("platforms")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let first_release_year = item
        .get("first_release_date")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.year());

    Some(Game {
        id,
        name,
        summary: item.get("summary").and_then(Value::as_str).map(String::from),
        cover_url: item
            .pointer("/cover/url")
            .and_then(Value::as_str)
            .map(normalize_cover_url),
        platforms,
        first_release_year,
    })
}

/// Cover urls come back protocol-relative and thumbnail-sized; rewrite to a
/// https url at display resolution.
fn normalize_cover_url(url: &str) -> String {
    let url = url.replace("t_thumb", "t_cover_big");
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        url
    }
}
