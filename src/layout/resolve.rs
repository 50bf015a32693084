use super::catalog::{BlockCatalog, ThemeCatalog};
use super::error::LayoutError;
use super::types::{
    BlockType, ProfileBlock, ProfileLayout, ProfileTheme, ResolvedBlock, ResolvedLayout, ThemeRef,
};

/// Pin a block's variant and merge catalog defaults under its config.
///
/// The effective variant is the block's declared one, or the definition's
/// default when absent. Merge order: variant defaults first, then the block's
/// own config on top, key by key. Keys only the block knows about survive
/// untouched, so resolving an already resolved block changes nothing.
pub fn resolve_block(block: &ProfileBlock, catalog: &BlockCatalog) -> Result<ResolvedBlock, LayoutError> {
    let block_type = BlockType::parse(&block.block_type).ok_or_else(|| {
        LayoutError::UnknownBlockType {
            block_id: block.id.clone(),
            block_type: block.block_type.clone(),
        }
    })?;

    // A type can be in the closed set yet absent from an overridden catalog;
    // that hole surfaces here, not at startup.
    let definition = catalog.definition(block_type).ok_or_else(|| {
        LayoutError::UnknownVariant {
            block_id: block.id.clone(),
            block_type: block_type.to_string(),
            variant: block.variant.clone().unwrap_or_default(),
        }
    })?;

    let variant_name = block.variant.as_deref().unwrap_or(&definition.default_variant);
    let variant = definition.variant(variant_name).ok_or_else(|| {
        LayoutError::UnknownVariant {
            block_id: block.id.clone(),
            block_type: block_type.to_string(),
            variant: variant_name.to_string(),
        }
    })?;

    let mut config = variant.default_config.clone();
    for (key, value) in &block.config {
        config.insert(key.clone(), value.clone());
    }

    Ok(ResolvedBlock {
        id: block.id.clone(),
        block_type,
        variant: variant_name.to_string(),
        config,
    })
}

/// Turn a theme reference into concrete colors. Presets come back named by
/// their catalog id; custom themes pass through untouched.
pub fn resolve_theme(theme: &ThemeRef, catalog: &ThemeCatalog) -> Result<ProfileTheme, LayoutError> {
    match theme {
        ThemeRef::Preset(id) => {
            let preset = catalog.preset(id).ok_or_else(|| LayoutError::UnknownThemePreset {
                preset: id.clone(),
            })?;
            Ok(ProfileTheme {
                name: preset.id.clone(),
                colors: preset.colors.clone(),
            })
        }
        ThemeRef::Custom(theme) => Ok(theme.clone()),
    }
}

/// Resolve every block in order plus the theme. Rendering clients get this
/// shape and never consult the catalogs themselves.
pub fn resolve_layout(
    layout: &ProfileLayout,
    blocks: &BlockCatalog,
    themes: &ThemeCatalog,
) -> Result<ResolvedLayout, LayoutError> {
    let resolved_blocks = layout
        .blocks
        .iter()
        .map(|block| resolve_block(block, blocks))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedLayout {
        profile_id: layout.profile_id,
        blocks: resolved_blocks,
        theme: resolve_theme(&layout.theme, themes)?,
        updated_at: layout.updated_at,
    })
}
