use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ProfileConfig;

const MAX_DISPLAY_NAME: usize = 60;
const MIN_USERNAME: usize = 3;
const MAX_USERNAME: usize = 24;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: Option<String>,
    pub links: Value,
    pub favorite_games: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteGame {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
}

/// Partial profile update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: Option<String>,
    pub links: Option<Vec<SocialLink>>,
    pub favorite_games: Option<Vec<FavoriteGame>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("username must be {min}-{max} characters: lowercase letters, digits, '-' or '_'")]
    InvalidUsername { min: usize, max: usize },

    #[error("display name cannot be empty")]
    EmptyDisplayName,

    #[error("display name exceeds {max} characters")]
    DisplayNameTooLong { max: usize },

    #[error("bio exceeds {max} characters")]
    BioTooLong { max: usize },

    #[error("too many links (limit {max})")]
    TooManyLinks { max: usize },

    #[error("link label cannot be empty")]
    EmptyLinkLabel { index: usize },

    #[error("link url must be a valid http(s) url")]
    InvalidLinkUrl { index: usize },

    #[error("too many favorite games (limit {max})")]
    TooManyFavorites { max: usize },

    #[error("game name cannot be empty")]
    EmptyGameName { index: usize },

    #[error("{field} must be a valid http(s) url")]
    InvalidImageUrl { field: String },
}

impl ProfileError {
    /// Dot-path of the offending field, for `field_errors` maps.
    pub fn field(&self) -> String {
        match self {
            ProfileError::InvalidUsername { .. } => "username".to_string(),
            ProfileError::EmptyDisplayName => "display_name".to_string(),
            ProfileError::DisplayNameTooLong { .. } => "display_name".to_string(),
            ProfileError::BioTooLong { .. } => "bio".to_string(),
            ProfileError::TooManyLinks { .. } => "links".to_string(),
            ProfileError::EmptyLinkLabel { index } => format!("links[{}].label", index),
            ProfileError::InvalidLinkUrl { index } => format!("links[{}].url", index),
            ProfileError::TooManyFavorites { .. } => "favorite_games".to_string(),
            ProfileError::EmptyGameName { index } => format!("favorite_games[{}].name", index),
            ProfileError::InvalidImageUrl { field } => field.clone(),
        }
    }
}

impl UpdateProfile {
    /// Validate the update against configured limits before it reaches the
    /// database. Fields left out of the update are not checked.
    pub fn validate(&self, limits: &ProfileConfig) -> Result<(), ProfileError> {
        if let Some(username) = &self.username {
            if !is_valid_username(username) {
                return Err(ProfileError::InvalidUsername { min: MIN_USERNAME, max: MAX_USERNAME });
            }
        }

        if let Some(display_name) = &self.display_name {
            if display_name.trim().is_empty() {
                return Err(ProfileError::EmptyDisplayName);
            }
            if display_name.chars().count() > MAX_DISPLAY_NAME {
                return Err(ProfileError::DisplayNameTooLong { max: MAX_DISPLAY_NAME });
            }
        }

        if let Some(bio) = &self.bio {
            if bio.chars().count() > limits.max_bio_length {
                return Err(ProfileError::BioTooLong { max: limits.max_bio_length });
            }
        }

        if let Some(url) = &self.avatar_url {
            if !url.is_empty() && !is_http_url(url) {
                return Err(ProfileError::InvalidImageUrl { field: "avatar_url".to_string() });
            }
        }

        if let Some(url) = &self.banner_url {
            if !url.is_empty() && !is_http_url(url) {
                return Err(ProfileError::InvalidImageUrl { field: "banner_url".to_string() });
            }
        }

        if let Some(links) = &self.links {
            if links.len() > limits.max_links {
                return Err(ProfileError::TooManyLinks { max: limits.max_links });
            }
            for (index, link) in links.iter().enumerate() {
                if link.label.trim().is_empty() {
                    return Err(ProfileError::EmptyLinkLabel { index });
                }
                if !is_http_url(&link.url) {
                    return Err(ProfileError::InvalidLinkUrl { index });
                }
            }
        }

        if let Some(games) = &self.favorite_games {
            if games.len() > limits.max_favorite_games {
                return Err(ProfileError::TooManyFavorites { max: limits.max_favorite_games });
            }
            for (index, game) in games.iter().enumerate() {
                if game.name.trim().is_empty() {
                    return Err(ProfileError::EmptyGameName { index });
                }
            }
        }

        Ok(())
    }
}

fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(MIN_USERNAME..=MAX_USERNAME).contains(&len) {
        return false;
    }
    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn limits() -> ProfileConfig {
        AppConfig::from_env().profile
    }

    #[test]
    fn accepts_a_reasonable_update() {
        let update = UpdateProfile {
            display_name: Some("Night Owl".to_string()),
            bio: Some("Co-op enjoyer. Mostly roguelikes.".to_string()),
            links: Some(vec![SocialLink {
                label: "Twitch".to_string(),
                url: "https://twitch.tv/nightowl".to_string(),
            }]),
            ..Default::default()
        };
        assert!(update.validate(&limits()).is_ok());
    }

    #[test]
    fn rejects_an_oversized_bio() {
        let limits = limits();
        let update = UpdateProfile {
            bio: Some("x".repeat(limits.max_bio_length + 1)),
            ..Default::default()
        };
        let err = update.validate(&limits).unwrap_err();
        assert_eq!(err.field(), "bio");
    }

    #[test]
    fn rejects_a_link_without_scheme() {
        let update = UpdateProfile {
            links: Some(vec![SocialLink {
                label: "Site".to_string(),
                url: "playerdeck.gg/me".to_string(),
            }]),
            ..Default::default()
        };
        let err = update.validate(&limits()).unwrap_err();
        assert_eq!(err, ProfileError::InvalidLinkUrl { index: 0 });
        assert_eq!(err.field(), "links[0].url");
    }

    #[test]
    fn rejects_too_many_links() {
        let limits = limits();
        let link = SocialLink {
            label: "Link".to_string(),
            url: "https://example.com".to_string(),
        };
        let update = UpdateProfile {
            links: Some(vec![link; limits.max_links + 1]),
            ..Default::default()
        };
        assert_eq!(
            update.validate(&limits).unwrap_err(),
            ProfileError::TooManyLinks { max: limits.max_links }
        );
    }

    #[test]
    fn validates_usernames() {
        for good in ["nightowl", "night-owl", "night_owl_7", "abc"] {
            assert!(is_valid_username(good), "{} should be valid", good);
        }
        for bad in ["ab", "NightOwl", "-leading", "with space", "way_too_long_for_a_username"] {
            assert!(!is_valid_username(bad), "{} should be invalid", bad);
        }
    }
}
