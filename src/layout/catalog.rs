use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::types::{BlockType, GradientPair, ThemeColors};
use crate::config;

/// One selectable presentation of a block type, with the configuration a
/// block of that variant starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockVariant {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_config: Map<String, Value>,
}

/// Catalog entry describing the variants that exist for one block type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: String,
    pub default_variant: String,
    pub variants: Vec<BlockVariant>,
}

impl BlockDefinition {
    pub fn variant(&self, name: &str) -> Option<&BlockVariant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// The static block catalog. Read-only input to validation and resolution;
/// never derived from user data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCatalog {
    pub blocks: Vec<BlockDefinition>,
}

impl BlockCatalog {
    pub fn definition(&self, block_type: BlockType) -> Option<&BlockDefinition> {
        self.blocks.iter().find(|d| d.block_type == block_type)
    }

    pub fn variant(&self, block_type: BlockType, name: &str) -> Option<&BlockVariant> {
        self.definition(block_type).and_then(|d| d.variant(name))
    }

    /// Parse a catalog override file:
    ///
    /// ```yaml
    /// blocks:
    ///   - type: games
    ///     label: Favorite games
    ///     default_variant: grid
    ///     variants:
    ///       - name: grid
    ///         default_config:
    ///           columns: 3
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// The compiled-in catalog. Covers every member of the closed block type
    /// set; a YAML override replaces it wholesale.
    pub fn builtin() -> Self {
        Self {
            blocks: vec![
                definition(BlockType::Header, "Header", "banner", vec![
                    variant("banner", "Banner image with avatar overlay", json!({
                        "show_avatar": true,
                        "show_status": true,
                        "banner_url": null,
                    })),
                    variant("minimal", "Name and avatar only", json!({
                        "show_avatar": true,
                        "show_status": false,
                    })),
                ]),
                definition(BlockType::About, "About", "text", vec![
                    variant("text", "Free-form text", json!({
                        "content": "",
                    })),
                    variant("card", "Text card with join date", json!({
                        "content": "",
                        "show_joined_date": true,
                    })),
                ]),
                definition(BlockType::Games, "Favorite games", "grid", vec![
                    variant("grid", "Cover art grid", json!({
                        "columns": 3,
                        "show_hours": true,
                    })),
                    variant("list", "Compact list", json!({
                        "limit": 10,
                        "show_hours": true,
                    })),
                ]),
                definition(BlockType::Friends, "Friends", "grid", vec![
                    variant("grid", "Avatar grid", json!({
                        "columns": 4,
                        "limit": 12,
                    })),
                    variant("list", "Name list with status", json!({
                        "limit": 24,
                        "show_status": true,
                    })),
                ]),
                definition(BlockType::Achievements, "Achievements", "showcase", vec![
                    variant("showcase", "Pinned highlights", json!({
                        "limit": 6,
                        "show_rarity": true,
                    })),
                    variant("timeline", "Recent unlocks", json!({
                        "limit": 15,
                    })),
                ]),
                definition(BlockType::Accounts, "Connected accounts", "icons", vec![
                    variant("icons", "Icon row", json!({
                        "show_labels": false,
                    })),
                    variant("list", "Labeled list", json!({
                        "show_labels": true,
                    })),
                ]),
                definition(BlockType::Custom, "Custom", "markdown", vec![
                    variant("markdown", "Markdown text", json!({
                        "content": "",
                    })),
                    variant("links", "Link buttons", json!({
                        "links": [],
                    })),
                ]),
                definition(BlockType::Stream, "Live stream", "player", vec![
                    variant("player", "Embedded player", json!({
                        "autoplay": false,
                        "muted": true,
                    })),
                    variant("status", "Live/offline badge", json!({
                        "show_offline": false,
                    })),
                ]),
                definition(BlockType::Roster, "Team roster", "grid", vec![
                    variant("grid", "Member cards", json!({
                        "columns": 3,
                        "show_roles": true,
                    })),
                    variant("compact", "Names only", json!({
                        "show_roles": false,
                    })),
                ]),
                definition(BlockType::Gallery, "Gallery", "grid", vec![
                    variant("grid", "Image grid", json!({
                        "columns": 3,
                        "lightbox": true,
                    })),
                    variant("masonry", "Masonry columns", json!({
                        "columns": 4,
                        "lightbox": true,
                    })),
                ]),
            ],
        }
    }
}

/// A ready-made theme: identifier plus concrete colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemePreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub colors: ThemeColors,
}

/// The static theme preset catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub presets: Vec<ThemePreset>,
}

impl ThemeCatalog {
    pub fn preset(&self, id: &str) -> Option<&ThemePreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn builtin() -> Self {
        Self {
            presets: vec![
                preset(
                    "midnight",
                    "Midnight",
                    "Deep navy with sky accents",
                    colors("#0f172a", "#1e293b", "#38bdf8", "#818cf8", "#f8fafc", "#94a3b8", "#1e293b", "#334155"),
                ),
                preset(
                    "daybreak",
                    "Daybreak",
                    "Warm light mode",
                    colors("#fafaf9", "#e7e5e4", "#ea580c", "#f59e0b", "#1c1917", "#57534e", "#ffffff", "#d6d3d1"),
                ),
                preset(
                    "synthwave",
                    "Synthwave",
                    "Purple dusk and neon pink",
                    colors("#2e1065", "#701a75", "#f472b6", "#22d3ee", "#fdf4ff", "#c4b5fd", "#3b0764", "#7e22ce"),
                ),
                preset(
                    "emerald",
                    "Emerald",
                    "Dark green felt",
                    colors("#022c22", "#064e3b", "#34d399", "#a7f3d0", "#ecfdf5", "#6ee7b7", "#064e3b", "#10b981"),
                ),
                preset(
                    "crimson",
                    "Crimson",
                    "Charcoal with ember reds",
                    colors("#1c1917", "#450a0a", "#f87171", "#fbbf24", "#fef2f2", "#a8a29e", "#292524", "#7f1d1d"),
                ),
                preset(
                    "terminal",
                    "Terminal",
                    "Phosphor green on black",
                    colors("#09090b", "#18181b", "#22c55e", "#86efac", "#e4e4e7", "#71717a", "#18181b", "#3f3f46"),
                ),
            ],
        }
    }
}

/// Both catalogs, loaded once per process.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub blocks: BlockCatalog,
    pub themes: ThemeCatalog,
}

static CATALOGS: Lazy<Catalogs> = Lazy::new(load);

/// Process-wide catalogs: compiled-in defaults, or the YAML files named in
/// config. A file that cannot be read or parsed logs a warning and falls
/// back; semantic holes (e.g. a default_variant missing from variants) are
/// deliberately not checked here and surface per call from the resolver.
pub fn catalogs() -> &'static Catalogs {
    &CATALOGS
}

fn load() -> Catalogs {
    let cfg = config::config();

    let blocks = match cfg.layout.block_catalog_path.as_deref() {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => match BlockCatalog::from_yaml(&source) {
                Ok(catalog) => {
                    tracing::info!("Loaded block catalog from {}", path);
                    catalog
                }
                Err(e) => {
                    tracing::warn!("Invalid block catalog {}: {} - using builtin", path, e);
                    BlockCatalog::builtin()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read block catalog {}: {} - using builtin", path, e);
                BlockCatalog::builtin()
            }
        },
        None => BlockCatalog::builtin(),
    };

    let themes = match cfg.layout.theme_catalog_path.as_deref() {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => match ThemeCatalog::from_yaml(&source) {
                Ok(catalog) => {
                    tracing::info!("Loaded theme catalog from {}", path);
                    catalog
                }
                Err(e) => {
                    tracing::warn!("Invalid theme catalog {}: {} - using builtin", path, e);
                    ThemeCatalog::builtin()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read theme catalog {}: {} - using builtin", path, e);
                ThemeCatalog::builtin()
            }
        },
        None => ThemeCatalog::builtin(),
    };

    Catalogs { blocks, themes }
}

fn variant(name: &str, description: &str, default_config: Value) -> BlockVariant {
    let default_config = match default_config {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    BlockVariant {
        name: name.to_string(),
        description: description.to_string(),
        default_config,
    }
}

fn definition(
    block_type: BlockType,
    label: &str,
    default_variant: &str,
    variants: Vec<BlockVariant>,
) -> BlockDefinition {
    BlockDefinition {
        block_type,
        label: label.to_string(),
        default_variant: default_variant.to_string(),
        variants,
    }
}

fn preset(id: &str, name: &str, description: &str, colors: ThemeColors) -> ThemePreset {
    ThemePreset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        colors,
    }
}

#[allow(clippy::too_many_arguments)]
fn colors(
    from: &str,
    to: &str,
    accent: &str,
    accent_secondary: &str,
    text: &str,
    text_secondary: &str,
    card_background: &str,
    card_border: &str,
) -> ThemeColors {
    ThemeColors {
        background: GradientPair { from: from.to_string(), to: to.to_string() },
        accent: accent.to_string(),
        accent_secondary: accent_secondary.to_string(),
        text: text.to_string(),
        text_secondary: text_secondary.to_string(),
        card_background: card_background.to_string(),
        card_border: card_border.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::color::is_valid_color;

    #[test]
    fn builtin_covers_every_block_type() {
        let catalog = BlockCatalog::builtin();
        for block_type in BlockType::ALL {
            let def = catalog
                .definition(block_type)
                .unwrap_or_else(|| panic!("no definition for {}", block_type));
            assert!(
                def.variant(&def.default_variant).is_some(),
                "{} default variant '{}' is not cataloged",
                block_type,
                def.default_variant
            );
            assert!(!def.variants.is_empty());
        }
    }

    #[test]
    fn builtin_presets_have_valid_colors() {
        let catalog = ThemeCatalog::builtin();
        assert!(catalog.preset("midnight").is_some());
        for preset in &catalog.presets {
            for (token, value) in preset.colors.tokens() {
                assert!(
                    is_valid_color(value),
                    "preset '{}' token {} has invalid color {}",
                    preset.id,
                    token,
                    value
                );
            }
        }
    }

    #[test]
    fn unknown_lookups_return_none() {
        let catalog = BlockCatalog::builtin();
        assert!(catalog.variant(BlockType::Games, "holographic").is_none());
        assert!(ThemeCatalog::builtin().preset("vaporwave").is_none());
    }

    #[test]
    fn parses_a_yaml_override() {
        let catalog = BlockCatalog::from_yaml(
            r#"
blocks:
  - type: games
    label: Favorite games
    default_variant: grid
    variants:
      - name: grid
        description: Cover art grid
        default_config:
          columns: 2
          show_hours: false
"#,
        )
        .unwrap();

        assert_eq!(catalog.blocks.len(), 1);
        let variant = catalog.variant(BlockType::Games, "grid").unwrap();
        assert_eq!(variant.default_config["columns"], serde_json::json!(2));
        // wholesale replacement: anything not listed is gone
        assert!(catalog.definition(BlockType::Header).is_none());
    }

    #[test]
    fn parses_a_theme_yaml_override() {
        let catalog = ThemeCatalog::from_yaml(
            r##"
presets:
  - id: mono
    name: Mono
    colors:
      background: { from: "#000000", to: "#111111" }
      accent: "#ffffff"
      accent_secondary: "#cccccc"
      text: "#ffffff"
      text_secondary: "#888888"
      card_background: "#111111"
      card_border: "#333333"
"##,
        )
        .unwrap();

        let preset = catalog.preset("mono").unwrap();
        assert_eq!(preset.colors.accent, "#ffffff");
        assert_eq!(preset.description, "");
    }
}
