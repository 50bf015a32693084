use std::sync::OnceLock;
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

pub mod games;
pub mod music;

pub use games::Game;
pub use music::Track;

/// Errors from upstream provider integrations
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("Could not decode upstream response: {0}")]
    Decode(String),
}

/// Shared HTTP client for all providers
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

/// Per-request timeout against upstreams
pub(crate) const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Client-credentials token cache. Tokens are refreshed shortly before the
/// provider-reported expiry so in-flight requests never carry a stale one.
pub(crate) struct TokenCache {
    token: RwLock<Option<CachedToken>>,
}

const EXPIRY_SLACK_SECS: u64 = 60;

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self { token: RwLock::new(None) }
    }

    pub(crate) async fn get(&self) -> Option<String> {
        let token = self.token.read().await;
        token
            .as_ref()
            .filter(|t| t.expires_at > Instant::now())
            .map(|t| t.access_token.clone())
    }

    pub(crate) async fn store(&self, access_token: String, expires_in_secs: u64) {
        let lifetime = expires_in_secs.saturating_sub(EXPIRY_SLACK_SECS);
        let cached = CachedToken {
            access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        };
        let mut slot = self.token.write().await;
        *slot = Some(cached);
    }
}

/// Pull `access_token` / `expires_in` out of a token endpoint response
pub(crate) fn parse_token_response(value: &Value) -> Result<(String, u64), IntegrationError> {
    let access_token = value
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| IntegrationError::Decode("token response missing access_token".to_string()))?;
    let expires_in = value.get("expires_in").and_then(Value::as_u64).unwrap_or(3600);
    Ok((access_token.to_string(), expires_in))
}

/// First part of an upstream error body, for logs and error context
pub(crate) fn body_snippet(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    body.chars().take(MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn token_cache_round_trip() {
        let cache = TokenCache::new();
        assert_eq!(cache.get().await, None);

        cache.store("abc".to_string(), 3600).await;
        assert_eq!(cache.get().await, Some("abc".to_string()));
    }

    #[tokio::test]
    async fn expired_tokens_are_not_returned() {
        let cache = TokenCache::new();
        // Lifetime under the refresh slack counts as already expired
        cache.store("abc".to_string(), 30).await;
        assert_eq!(cache.get().await, None);
    }

    #[test]
    fn parses_a_token_response() {
        let (token, expires_in) =
            parse_token_response(&json!({"access_token": "t0k", "expires_in": 1200})).unwrap();
        assert_eq!(token, "t0k");
        assert_eq!(expires_in, 1200);

        let (_, default_expiry) = parse_token_response(&json!({"access_token": "t0k"})).unwrap();
        assert_eq!(default_expiry, 3600);

        assert!(parse_token_response(&json!({"error": "invalid_client"})).is_err());
    }
}
