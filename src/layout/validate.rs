use std::collections::HashSet;

use super::catalog::{BlockCatalog, ThemeCatalog};
use super::color::ensure_colors;
use super::error::LayoutError;
use super::types::{BlockType, ProfileLayout, ThemeRef};

/// Check a layout draft against the catalogs. Returns the first violation in
/// document order, so repeated calls on the same draft report the same error.
///
/// Checks, per block: id present, id unique, type in the closed set, declared
/// variant cataloged for that type. Then the theme: preset id known, effective
/// colors well-formed. A layout that passes here is safe to persist and to
/// resolve.
pub fn validate_layout(
    layout: &ProfileLayout,
    blocks: &BlockCatalog,
    themes: &ThemeCatalog,
) -> Result<(), LayoutError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(layout.blocks.len());

    for (index, block) in layout.blocks.iter().enumerate() {
        if block.id.trim().is_empty() {
            return Err(LayoutError::MissingField {
                field: format!("blocks[{}].id", index),
            });
        }

        if !seen.insert(block.id.as_str()) {
            return Err(LayoutError::DuplicateBlockId {
                block_id: block.id.clone(),
            });
        }

        let block_type = BlockType::parse(&block.block_type).ok_or_else(|| {
            LayoutError::UnknownBlockType {
                block_id: block.id.clone(),
                block_type: block.block_type.clone(),
            }
        })?;

        if let Some(variant) = &block.variant {
            let known = blocks
                .definition(block_type)
                .map(|def| def.variant(variant).is_some())
                .unwrap_or(false);
            if !known {
                return Err(LayoutError::UnknownVariant {
                    block_id: block.id.clone(),
                    block_type: block_type.to_string(),
                    variant: variant.clone(),
                });
            }
        }
    }

    match &layout.theme {
        ThemeRef::Preset(id) => {
            let preset = themes.preset(id).ok_or_else(|| LayoutError::UnknownThemePreset {
                preset: id.clone(),
            })?;
            // Preset colors come from the catalog, but a YAML override can
            // carry junk; a bad token fails the call rather than the boot.
            ensure_colors(&preset.colors)?;
        }
        ThemeRef::Custom(theme) => {
            ensure_colors(&theme.colors)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{GradientPair, ProfileBlock, ProfileTheme, ThemeColors};
    use chrono::Utc;
    use serde_json::Map;
    use uuid::Uuid;

    fn block(id: &str, block_type: &str) -> ProfileBlock {
        ProfileBlock {
            id: id.to_string(),
            block_type: block_type.to_string(),
            variant: None,
            config: Map::new(),
        }
    }

    fn layout_with(blocks: Vec<ProfileBlock>) -> ProfileLayout {
        ProfileLayout {
            profile_id: Uuid::new_v4(),
            blocks,
            theme: ThemeRef::Preset("midnight".to_string()),
            updated_at: Utc::now(),
        }
    }

    fn catalogs() -> (BlockCatalog, ThemeCatalog) {
        (BlockCatalog::builtin(), ThemeCatalog::builtin())
    }

    #[test]
    fn accepts_a_starter_layout() {
        let (blocks, themes) = catalogs();
        let layout = ProfileLayout::starter(Uuid::new_v4());
        assert!(validate_layout(&layout, &blocks, &themes).is_ok());
    }

    #[test]
    fn validation_is_repeatable() {
        let (blocks, themes) = catalogs();
        let layout = layout_with(vec![block("b1", "header"), block("b1", "games")]);
        let first = validate_layout(&layout, &blocks, &themes).unwrap_err();
        let second = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_duplicate_block_ids_naming_the_block() {
        let (blocks, themes) = catalogs();
        let layout = layout_with(vec![block("b1", "header"), block("b1", "games")]);
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateBlockId { block_id: "b1".to_string() });
    }

    #[test]
    fn rejects_an_empty_block_id() {
        let (blocks, themes) = catalogs();
        let layout = layout_with(vec![block("  ", "header")]);
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(err, LayoutError::MissingField { field: "blocks[0].id".to_string() });
    }

    #[test]
    fn rejects_a_type_outside_the_closed_set() {
        let (blocks, themes) = catalogs();
        let layout = layout_with(vec![block("b1", "header"), block("b2", "weather")]);
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownBlockType {
                block_id: "b2".to_string(),
                block_type: "weather".to_string(),
            }
        );
    }

    #[test]
    fn rejects_a_variant_the_catalog_does_not_list() {
        let (blocks, themes) = catalogs();
        let mut games = block("b1", "games");
        games.variant = Some("holographic".to_string());
        let layout = layout_with(vec![games]);
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownVariant {
                block_id: "b1".to_string(),
                block_type: "games".to_string(),
                variant: "holographic".to_string(),
            }
        );
    }

    #[test]
    fn accepts_a_cataloged_variant() {
        let (blocks, themes) = catalogs();
        let mut games = block("b1", "games");
        games.variant = Some("list".to_string());
        let layout = layout_with(vec![games]);
        assert!(validate_layout(&layout, &blocks, &themes).is_ok());
    }

    #[test]
    fn reports_the_first_bad_block_in_document_order() {
        let (blocks, themes) = catalogs();
        let layout = layout_with(vec![block("b1", "weather"), block("b2", "astrology")]);
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownBlockType {
                block_id: "b1".to_string(),
                block_type: "weather".to_string(),
            }
        );
    }

    #[test]
    fn rejects_an_unknown_theme_preset() {
        let (blocks, themes) = catalogs();
        let mut layout = layout_with(vec![block("b1", "header")]);
        layout.theme = ThemeRef::Preset("vaporwave".to_string());
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(err, LayoutError::UnknownThemePreset { preset: "vaporwave".to_string() });
    }

    #[test]
    fn rejects_a_custom_theme_with_a_bad_color() {
        let (blocks, themes) = catalogs();
        let mut layout = layout_with(vec![block("b1", "header")]);
        layout.theme = ThemeRef::Custom(ProfileTheme {
            name: "mine".to_string(),
            colors: ThemeColors {
                background: GradientPair {
                    from: "#0f172a".to_string(),
                    to: "#1e293b".to_string(),
                },
                accent: "sky-blue".to_string(),
                accent_secondary: "#818cf8".to_string(),
                text: "#f8fafc".to_string(),
                text_secondary: "#94a3b8".to_string(),
                card_background: "#1e293b".to_string(),
                card_border: "#334155".to_string(),
            },
        });
        let err = validate_layout(&layout, &blocks, &themes).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidColor {
                token: "accent".to_string(),
                value: "sky-blue".to_string(),
            }
        );
    }
}
