//! Event color handling for the host template
//!
//! Calendars are assigned a background color in the settings; the text color
//! placed on top of it is picked by perceived brightness so event rows stay
//! readable on the e-ink palette.

use crate::error::PluginError;

/// Background color applied when the settings carry fewer colors than URLs
pub const DEFAULT_EVENT_COLOR: &str = "#007BFF";

/// Parse a `#rrggbb` hex color into RGB components
pub fn parse_hex(color: &str) -> Result<(u8, u8, u8), PluginError> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PluginError::settings(format!(
            "invalid color '{color}', expected #rrggbb"
        )));
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    Ok((r, g, b))
}

/// Pick black or white text for the given background color.
///
/// Uses the YIQ brightness estimate; backgrounds at or above 150 get black
/// text, darker ones get white.
#[must_use]
pub fn contrast_color(background: &str) -> &'static str {
    let (r, g, b) = parse_hex(background).unwrap_or((0, 123, 255));
    let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    if yiq >= 150 { "#000000" } else { "#ffffff" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#007BFF").unwrap(), (0, 123, 255));
        assert_eq!(parse_hex("ffffff").unwrap(), (255, 255, 255));
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#gggggg").is_err());
    }

    #[rstest]
    #[case("#ffffff", "#000000")]
    #[case("#000000", "#ffffff")]
    #[case("#007BFF", "#ffffff")]
    #[case("#ffe680", "#000000")]
    fn test_contrast_color(#[case] background: &str, #[case] expected: &'static str) {
        assert_eq!(contrast_color(background), expected);
    }

    #[test]
    fn test_contrast_color_bad_input_uses_default() {
        // Unparseable colors fall back to the default event blue (dark)
        assert_eq!(contrast_color("not-a-color"), "#ffffff");
    }
}
