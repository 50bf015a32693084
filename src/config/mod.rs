use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub layout: LayoutConfig,
    pub database: DatabaseConfig,
    pub profile: ProfileConfig,
    pub security: SecurityConfig,
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub max_blocks: usize,
    pub max_document_bytes: usize,
    pub block_catalog_path: Option<String>,
    pub theme_catalog_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub max_bio_length: usize,
    pub max_links: usize,
    pub max_favorite_games: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    pub music: ProviderConfig,
    pub games: ProviderConfig,
}

/// Client-credentials settings for one upstream provider. Credentials are
/// optional; an unconfigured provider turns its endpoints off rather than
/// failing startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    pub api_url: String,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Layout overrides
        if let Ok(v) = env::var("LAYOUT_MAX_BLOCKS") {
            self.layout.max_blocks = v.parse().unwrap_or(self.layout.max_blocks);
        }
        if let Ok(v) = env::var("LAYOUT_MAX_DOCUMENT_BYTES") {
            self.layout.max_document_bytes = v.parse().unwrap_or(self.layout.max_document_bytes);
        }
        if let Ok(v) = env::var("LAYOUT_BLOCK_CATALOG") {
            self.layout.block_catalog_path = Some(v);
        }
        if let Ok(v) = env::var("LAYOUT_THEME_CATALOG") {
            self.layout.theme_catalog_path = Some(v);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // Profile overrides
        if let Ok(v) = env::var("PROFILE_MAX_BIO_LENGTH") {
            self.profile.max_bio_length = v.parse().unwrap_or(self.profile.max_bio_length);
        }
        if let Ok(v) = env::var("PROFILE_MAX_LINKS") {
            self.profile.max_links = v.parse().unwrap_or(self.profile.max_links);
        }
        if let Ok(v) = env::var("PROFILE_MAX_FAVORITE_GAMES") {
            self.profile.max_favorite_games = v.parse().unwrap_or(self.profile.max_favorite_games);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("PLAYERDECK_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Integration overrides
        if let Ok(v) = env::var("MUSIC_CLIENT_ID") {
            self.integrations.music.client_id = Some(v);
        }
        if let Ok(v) = env::var("MUSIC_CLIENT_SECRET") {
            self.integrations.music.client_secret = Some(v);
        }
        if let Ok(v) = env::var("MUSIC_TOKEN_URL") {
            self.integrations.music.token_url = v;
        }
        if let Ok(v) = env::var("MUSIC_API_URL") {
            self.integrations.music.api_url = v;
        }
        if let Ok(v) = env::var("GAMES_CLIENT_ID") {
            self.integrations.games.client_id = Some(v);
        }
        if let Ok(v) = env::var("GAMES_CLIENT_SECRET") {
            self.integrations.games.client_secret = Some(v);
        }
        if let Ok(v) = env::var("GAMES_TOKEN_URL") {
            self.integrations.games.token_url = v;
        }
        if let Ok(v) = env::var("GAMES_API_URL") {
            self.integrations.games.api_url = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            layout: LayoutConfig {
                max_blocks: 30,
                max_document_bytes: 64 * 1024, // 64KB
                block_catalog_path: None,
                theme_catalog_path: None,
            },
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            profile: ProfileConfig {
                max_bio_length: 500,
                max_links: 10,
                max_favorite_games: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                // Dev-only fallback so local servers and tests run unconfigured
                jwt_secret: "playerdeck-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            integrations: IntegrationsConfig {
                music: ProviderConfig {
                    client_id: None,
                    client_secret: None,
                    token_url: "https://accounts.spotify.com/api/token".to_string(),
                    api_url: "https://api.spotify.com/v1".to_string(),
                },
                games: ProviderConfig {
                    client_id: None,
                    client_secret: None,
                    token_url: "https://id.twitch.tv/oauth2/token".to_string(),
                    api_url: "https://api.igdb.com/v4".to_string(),
                },
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.playerdeck.gg".to_string()],
                jwt_secret: String::new(), // must come from PLAYERDECK_JWT_SECRET
                jwt_expiry_hours: 24,
            },
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            layout: LayoutConfig {
                max_blocks: 24,
                max_document_bytes: 32 * 1024, // 32KB
                block_catalog_path: None,
                theme_catalog_path: None,
            },
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            profile: ProfileConfig {
                max_bio_length: 500,
                max_links: 10,
                max_favorite_games: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://playerdeck.gg".to_string()],
                jwt_secret: String::new(), // must come from PLAYERDECK_JWT_SECRET
                jwt_expiry_hours: 12,
            },
            integrations: Self::development().integrations,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.layout.max_blocks, 30);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(config.layout.block_catalog_path.is_none());
        assert!(!config.integrations.music.is_configured());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.layout.max_blocks, 24);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.database.max_connections, 50);
    }

    #[test]
    fn test_provider_configured_needs_both_halves() {
        let mut provider = AppConfig::development().integrations.games;
        assert!(!provider.is_configured());
        provider.client_id = Some("abc".to_string());
        assert!(!provider.is_configured());
        provider.client_secret = Some("xyz".to_string());
        assert!(provider.is_configured());
    }
}
