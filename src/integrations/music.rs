use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{body_snippet, http_client, parse_token_response, IntegrationError, TokenCache, UPSTREAM_TIMEOUT};
use crate::config;

const PROVIDER: &str = "music";

/// One track search hit, normalized from the provider's wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork_url: Option<String>,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
}

fn token_cache() -> &'static TokenCache {
    static CACHE: OnceLock<TokenCache> = OnceLock::new();
    CACHE.get_or_init(TokenCache::new)
}

/// Search the music catalog for tracks matching `query`.
///
/// Uses the client-credentials flow: basic auth against the token endpoint,
/// bearer token against the search endpoint. Unconfigured credentials fail
/// fast without any network traffic.
pub async fn search_tracks(query: &str, limit: u32) -> Result<Vec<Track>, IntegrationError> {
    let cfg = &config::config().integrations.music;
    let (client_id, client_secret) = match (&cfg.client_id, &cfg.client_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => return Err(IntegrationError::NotConfigured(PROVIDER)),
    };

    let token = match token_cache().get().await {
        Some(token) => token,
        None => fetch_token(&cfg.token_url, client_id, client_secret).await?,
    };

    let limit = limit.to_string();
    let response = http_client()
        .get(format!("{}/search", cfg.api_url))
        .timeout(UPSTREAM_TIMEOUT)
        .bearer_auth(token)
        .query(&[("q", query), ("type", "track"), ("limit", &limit)])
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
    Ok(parse_tracks(&body))
}

async fn fetch_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, IntegrationError> {
    let response = http_client()
        .post(token_url)
        .timeout(UPSTREAM_TIMEOUT)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
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

/// Normalize a `tracks.items` search response. Entries missing required
/// fields are skipped rather than failing the whole page.
fn parse_tracks(body: &Value) -> Vec<Track> {
    let items = body
        .pointer("/tracks/items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    items.iter().filter_map(parse_track).collect()
}

fn parse_track(item: &Value) -> Option<Track> {
    let id = item.get("id")?.as_str()?.to_string();
    let title = item.get("name")?.as_str()?.to_string();
    let artist = item
        .pointer("/artists/0/name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown artist")
        .to_string();
    let album = item
        .pointer("/album/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Track {
        id,
        title,
        artist,
        album,
        artwork_url: item
            .pointer("/album/images/0/url")
            .and_then(Value::as_str)
            .map(String::from),
        preview_url: item
            .get("preview_url")
            .and_then(Value::as_str)
            .map(String::from),
        external_url: item
            .pointer("/external_urls/spotify")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_search_response() {
        let body = json!({
            "tracks": {
                "items": [
                    {
                        "id": "3n3Ppam7vgaVa1iaRUc9Lp",
                        "name": "Mr. Brightside",
                        "artists": [{"name": "The Killers"}],
                        "album": {
                            "name": "Hot Fuss",
                            "images": [{"url": "https://i.scdn.co/image/abc"}]
                        },
                        "preview_url": null,
                        "external_urls": {"spotify": "https://open.spotify.com/track/3n3"}
                    },
                    {
                        "name": "missing id, skipped"
                    }
                ]
            }
        });

        let tracks = parse_tracks(&body);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Mr. Brightside");
        assert_eq!(tracks[0].artist, "The Killers");
        assert_eq!(tracks[0].album, "Hot Fuss");
        assert_eq!(tracks[0].artwork_url.as_deref(), Some("https://i.scdn.co/image/abc"));
        assert_eq!(tracks[0].preview_url, None);
    }

    #[test]
    fn empty_or_malformed_bodies_parse_to_nothing() {
        assert!(parse_tracks(&json!({})).is_empty());
        assert!(parse_tracks(&json!({"tracks": {"items": "nope"}})).is_empty());
    }
}
