use super::error::LayoutError;
use super::types::ThemeColors;

/// Accepts the hex color forms the catalog and front end use:
/// `#RGB`, `#RRGGBB`, `#RRGGBBAA` (case-insensitive).
pub fn is_valid_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check one color token, naming it on failure.
pub fn ensure_color(token: &str, value: &str) -> Result<(), LayoutError> {
    if is_valid_color(value) {
        Ok(())
    } else {
        Err(LayoutError::InvalidColor {
            token: token.to_string(),
            value: value.to_string(),
        })
    }
}

/// Check every token of a color bundle, including both ends of the
/// background gradient pair.
pub fn ensure_colors(colors: &ThemeColors) -> Result<(), LayoutError> {
    for (token, value) in colors.tokens() {
        ensure_color(token, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_forms() {
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#0F172A"));
        assert!(is_valid_color("#38bdf8ff"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_valid_color(""));
        assert!(!is_valid_color("fff"));
        assert!(!is_valid_color("#ffff"));        // 4 digits
        assert!(!is_valid_color("#gggggg"));
        assert!(!is_valid_color("rgb(0, 0, 0)"));
        assert!(!is_valid_color("#38bdf8 "));
    }

    #[test]
    fn ensure_color_names_the_token() {
        let err = ensure_color("card_border", "nope").unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidColor {
                token: "card_border".to_string(),
                value: "nope".to_string(),
            }
        );
    }
}
