pub mod catalog;
pub mod color;
pub mod error;
pub mod order;
pub mod resolve;
pub mod types;
pub mod validate;

pub use catalog::{catalogs, BlockCatalog, BlockDefinition, BlockVariant, Catalogs, ThemeCatalog, ThemePreset};
pub use error::LayoutError;
pub use order::reorder_blocks;
pub use resolve::{resolve_block, resolve_layout, resolve_theme};
pub use types::*;
pub use validate::validate_layout;

/// Parse a raw JSON document into a layout and validate it against the
/// catalogs. The one entry point handlers and the CLI share.
pub fn validate_document(
    value: serde_json::Value,
    blocks: &BlockCatalog,
    themes: &ThemeCatalog,
) -> Result<ProfileLayout, LayoutError> {
    let layout = ProfileLayout::from_json(value)?;
    validate_layout(&layout, blocks, themes)?;
    Ok(layout)
}
