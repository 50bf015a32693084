use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::LayoutError;

/// Theme preset applied to layouts that never picked one.
pub const DEFAULT_THEME_PRESET: &str = "midnight";

/// The closed set of renderable block kinds. Anything outside this set is
/// rejected at validation time, never silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Header,
    Friends,
    Games,
    Achievements,
    Accounts,
    Custom,
    About,
    Stream,
    Roster,
    Gallery,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::Header,
        BlockType::Friends,
        BlockType::Games,
        BlockType::Achievements,
        BlockType::Accounts,
        BlockType::Custom,
        BlockType::About,
        BlockType::Stream,
        BlockType::Roster,
        BlockType::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Friends => "friends",
            BlockType::Games => "games",
            BlockType::Achievements => "achievements",
            BlockType::Accounts => "accounts",
            BlockType::Custom => "custom",
            BlockType::About => "about",
            BlockType::Stream => "stream",
            BlockType::Roster => "roster",
            BlockType::Gallery => "gallery",
        }
    }

    pub fn parse(s: &str) -> Option<BlockType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One section of a profile page as stored and edited.
///
/// `block_type` stays a plain string on this struct so that drafts with an
/// unrecognized type parse far enough for validation to reject them while
/// naming the offending block id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

/// Ordered gradient pair: `from` renders first (top/left), `to` second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientPair {
    pub from: String,
    pub to: String,
}

/// The full set of color tokens a theme must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: GradientPair,
    pub accent: String,
    pub accent_secondary: String,
    pub text: String,
    pub text_secondary: String,
    pub card_background: String,
    pub card_border: String,
}

impl ThemeColors {
    /// Every `(token path, value)` pair, gradient ends included.
    pub fn tokens(&self) -> [(&'static str, &str); 8] {
        [
            ("background.from", &self.background.from),
            ("background.to", &self.background.to),
            ("accent", &self.accent),
            ("accent_secondary", &self.accent_secondary),
            ("text", &self.text),
            ("text_secondary", &self.text_secondary),
            ("card_background", &self.card_background),
            ("card_border", &self.card_border),
        ]
    }
}

/// A concrete, self-contained theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTheme {
    pub name: String,
    pub colors: ThemeColors,
}

/// A stored theme is either a reference into the preset catalog or an inline
/// custom theme. On the wire: `"theme": "midnight"` or
/// `"theme": {"name": ..., "colors": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeRef {
    Preset(String),
    Custom(ProfileTheme),
}

/// A profile's whole customizable page: ordered blocks plus one theme.
/// Block order is render order and survives read/write round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLayout {
    pub profile_id: Uuid,
    pub blocks: Vec<ProfileBlock>,
    pub theme: ThemeRef,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ProfileLayout {
    /// The layout a profile gets implicitly on first customization, and the
    /// document reads fall back to while nothing is stored.
    pub fn starter(profile_id: Uuid) -> Self {
        let block = |id: &str, block_type: BlockType| ProfileBlock {
            id: id.to_string(),
            block_type: block_type.as_str().to_string(),
            variant: None,
            config: Map::new(),
        };

        Self {
            profile_id,
            blocks: vec![
                block("header", BlockType::Header),
                block("about", BlockType::About),
                block("games", BlockType::Games),
            ],
            theme: ThemeRef::Preset(DEFAULT_THEME_PRESET.to_string()),
            updated_at: Utc::now(),
        }
    }

    /// Parse a draft document submitted by an editing surface.
    ///
    /// Unlike a derived `Deserialize`, this walks the JSON by hand so that a
    /// malformed draft fails with a `LayoutError` naming the field path
    /// instead of aborting with a serde message. Type and variant membership
    /// are checked later by [`super::validate::validate_layout`].
    pub fn from_json(value: Value) -> Result<Self, LayoutError> {
        let obj = value
            .as_object()
            .ok_or_else(|| missing("profile_id"))?;

        let profile_id = obj
            .get("profile_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| missing("profile_id"))?;

        let raw_blocks = obj
            .get("blocks")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("blocks"))?;

        let mut blocks = Vec::with_capacity(raw_blocks.len());
        for (index, entry) in raw_blocks.iter().enumerate() {
            blocks.push(block_from_json(entry, index)?);
        }

        let theme = match obj.get("theme") {
            Some(Value::String(preset)) if !preset.is_empty() => {
                ThemeRef::Preset(preset.clone())
            }
            Some(Value::Object(theme_obj)) => ThemeRef::Custom(theme_from_json(theme_obj)?),
            _ => return Err(missing("theme")),
        };

        // Drafts may carry a stale timestamp; the server re-stamps on write.
        let updated_at = obj
            .get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(Self { profile_id, blocks, theme, updated_at })
    }

    /// Ids of the blocks in render order.
    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.id.as_str()).collect()
    }
}

fn missing(field: &str) -> LayoutError {
    LayoutError::MissingField { field: field.to_string() }
}

fn block_from_json(entry: &Value, index: usize) -> Result<ProfileBlock, LayoutError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| missing(&format!("blocks[{}]", index)))?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing(&format!("blocks[{}].id", index)))?
        .to_string();

    let block_type = obj
        .get("type")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing(&format!("blocks[{}].type", index)))?
        .to_string();

    let variant = match obj.get("variant") {
        None | Some(Value::Null) => None,
        Some(Value::String(v)) if !v.is_empty() => Some(v.clone()),
        Some(_) => return Err(missing(&format!("blocks[{}].variant", index))),
    };

    let config = match obj.get("config") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(missing(&format!("blocks[{}].config", index))),
    };

    Ok(ProfileBlock { id, block_type, variant, config })
}

fn theme_from_json(obj: &Map<String, Value>) -> Result<ProfileTheme, LayoutError> {
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("custom")
        .to_string();

    let colors = obj
        .get("colors")
        .and_then(Value::as_object)
        .ok_or_else(|| missing("theme.colors"))?;

    let token = |key: &str| -> Result<String, LayoutError> {
        colors
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| missing(&format!("theme.colors.{}", key)))
    };

    let background = colors
        .get("background")
        .and_then(Value::as_object)
        .ok_or_else(|| missing("theme.colors.background"))?;
    let gradient_end = |key: &str| -> Result<String, LayoutError> {
        background
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| missing(&format!("theme.colors.background.{}", key)))
    };

    Ok(ProfileTheme {
        name,
        colors: ThemeColors {
            background: GradientPair { from: gradient_end("from")?, to: gradient_end("to")? },
            accent: token("accent")?,
            accent_secondary: token("accent_secondary")?,
            text: token("text")?,
            text_secondary: token("text_secondary")?,
            card_background: token("card_background")?,
            card_border: token("card_border")?,
        },
    })
}

/// A block after catalog resolution: variant pinned, defaults merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub variant: String,
    pub config: Map<String, Value>,
}

impl ResolvedBlock {
    /// Back to the stored representation, keeping the pinned variant and the
    /// merged config. Resolving the result again is a no-op.
    pub fn into_block(self) -> ProfileBlock {
        ProfileBlock {
            id: self.id,
            block_type: self.block_type.as_str().to_string(),
            variant: Some(self.variant),
            config: self.config,
        }
    }
}

/// A rendering-ready layout: every block resolved, theme concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayout {
    pub profile_id: Uuid,
    pub blocks: Vec<ResolvedBlock>,
    pub theme: ProfileTheme,
    pub updated_at: DateTime<Utc>,
}

impl ResolvedLayout {
    /// Collapse back to a storable layout with every variant pinned and the
    /// theme inlined.
    pub fn into_layout(self) -> ProfileLayout {
        ProfileLayout {
            profile_id: self.profile_id,
            blocks: self.blocks.into_iter().map(ResolvedBlock::into_block).collect(),
            theme: ThemeRef::Custom(self.theme),
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_type_round_trips_through_strings() {
        for t in BlockType::ALL {
            assert_eq!(BlockType::parse(t.as_str()), Some(t));
        }
        assert_eq!(BlockType::parse("sparkles"), None);
        assert_eq!(BlockType::parse(""), None);
    }

    #[test]
    fn parses_a_minimal_draft() {
        let layout = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "blocks": [
                {"id": "b1", "type": "header"},
                {"id": "b2", "type": "games", "variant": "grid", "config": {"columns": 2}}
            ],
            "theme": "midnight"
        }))
        .unwrap();

        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.blocks[0].id, "b1");
        assert_eq!(layout.blocks[1].variant.as_deref(), Some("grid"));
        assert_eq!(layout.blocks[1].config["columns"], json!(2));
        assert_eq!(layout.theme, ThemeRef::Preset("midnight".to_string()));
    }

    #[test]
    fn parses_an_inline_theme() {
        let layout = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "blocks": [],
            "theme": {
                "name": "mine",
                "colors": {
                    "background": {"from": "#111111", "to": "#222222"},
                    "accent": "#38bdf8",
                    "accent_secondary": "#818cf8",
                    "text": "#f8fafc",
                    "text_secondary": "#94a3b8",
                    "card_background": "#1e293b",
                    "card_border": "#334155"
                }
            }
        }))
        .unwrap();

        match layout.theme {
            ThemeRef::Custom(theme) => {
                assert_eq!(theme.name, "mine");
                assert_eq!(theme.colors.background.from, "#111111");
            }
            ThemeRef::Preset(_) => panic!("expected an inline theme"),
        }
    }

    #[test]
    fn missing_fields_are_named() {
        let err = ProfileLayout::from_json(json!({"blocks": [], "theme": "midnight"})).unwrap_err();
        assert_eq!(err, LayoutError::MissingField { field: "profile_id".to_string() });

        let err = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "theme": "midnight"
        }))
        .unwrap_err();
        assert_eq!(err, LayoutError::MissingField { field: "blocks".to_string() });

        let err = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "blocks": [{"type": "header"}],
            "theme": "midnight"
        }))
        .unwrap_err();
        assert_eq!(err, LayoutError::MissingField { field: "blocks[0].id".to_string() });

        let err = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "blocks": [],
            "theme": {"colors": {"background": {"from": "#111111", "to": "#222222"}}}
        }))
        .unwrap_err();
        assert_eq!(err, LayoutError::MissingField { field: "theme.colors.accent".to_string() });
    }

    #[test]
    fn block_order_survives_serde_round_trip() {
        let layout = ProfileLayout::from_json(json!({
            "profile_id": "6b7f9d80-51b4-4c44-a3b4-1fe386c6a2a5",
            "blocks": [
                {"id": "z", "type": "gallery"},
                {"id": "a", "type": "about"},
                {"id": "m", "type": "stream"}
            ],
            "theme": "midnight"
        }))
        .unwrap();

        let value = serde_json::to_value(&layout).unwrap();
        let back: ProfileLayout = serde_json::from_value(value).unwrap();
        assert_eq!(back.block_ids(), vec!["z", "a", "m"]);
        assert_eq!(back, layout);
    }

    #[test]
    fn starter_layout_uses_the_default_preset() {
        let layout = ProfileLayout::starter(Uuid::new_v4());
        assert_eq!(layout.theme, ThemeRef::Preset(DEFAULT_THEME_PRESET.to_string()));
        assert_eq!(layout.block_ids(), vec!["header", "about", "games"]);
    }
}
