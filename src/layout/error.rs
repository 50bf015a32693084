use thiserror::Error;

/// Errors produced while parsing, validating, or resolving a layout document.
///
/// Every variant names the offending field, block id, or value so callers can
/// surface a precise user-facing message. Validation never auto-corrects a
/// document; the only defaulting behavior is the documented config merge in
/// block resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("missing or invalid field: {field}")]
    MissingField { field: String },

    #[error("duplicate block id: {block_id}")]
    DuplicateBlockId { block_id: String },

    #[error("unknown block type '{block_type}' on block '{block_id}'")]
    UnknownBlockType { block_id: String, block_type: String },

    #[error("unknown variant '{variant}' for {block_type} block '{block_id}'")]
    UnknownVariant {
        block_id: String,
        block_type: String,
        variant: String,
    },

    #[error("unknown theme preset: {preset}")]
    UnknownThemePreset { preset: String },

    #[error("invalid color '{value}' for {token}")]
    InvalidColor { token: String, value: String },

    #[error("reorder is not a permutation of the current blocks: {detail}")]
    InvalidPermutation { detail: String },
}

impl LayoutError {
    /// Dot-path of the field the error refers to. Used to key `field_errors`
    /// in HTTP validation responses.
    pub fn field(&self) -> String {
        match self {
            LayoutError::MissingField { field } => field.clone(),
            LayoutError::DuplicateBlockId { block_id } => format!("blocks.{}.id", block_id),
            LayoutError::UnknownBlockType { block_id, .. } => format!("blocks.{}.type", block_id),
            LayoutError::UnknownVariant { block_id, .. } => format!("blocks.{}.variant", block_id),
            LayoutError::UnknownThemePreset { .. } => "theme".to_string(),
            LayoutError::InvalidColor { token, .. } => format!("theme.colors.{}", token),
            LayoutError::InvalidPermutation { .. } => "order".to_string(),
        }
    }
}
