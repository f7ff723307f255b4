//! Theme palettes.
//!
//! The catalog is fixed at build time. Users pick from it; they never
//! define their own themes.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Identifier of the bootstrap theme.
pub const DEFAULT_THEME_ID: &str = "default";

/// Named color values used across every screen.
///
/// All colors are `#RRGGBB` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub background: String,
    pub card: String,
    pub text: String,
    pub text_secondary: String,
    pub border: String,
    pub notification: String,
}

/// A selectable color palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Stable key, persisted across sessions.
    pub id: String,
    /// Display label.
    pub name: String,
    pub colors: ThemeColors,
    /// Optional decorative background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Theme {
    fn builtin(
        id: &str,
        name: &str,
        colors: [&str; 7],
        background_image: Option<&str>,
    ) -> Self {
        let [primary, background, card, text, text_secondary, border, notification] = colors;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            colors: ThemeColors {
                primary: primary.to_string(),
                background: background.to_string(),
                card: card.to_string(),
                text: text.to_string(),
                text_secondary: text_secondary.to_string(),
                border: border.to_string(),
                notification: notification.to_string(),
            },
            background_image: background_image.map(str::to_string),
        }
    }

    /// Whether the palette has a dark background.
    ///
    /// Uses the relative luminance of the background color.
    pub fn is_dark(&self) -> bool {
        parse_hex(&self.colors.background)
            .map(|(r, g, b)| {
                let luminance = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
                luminance < 128.0
            })
            .unwrap_or(false)
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

// Color order: primary, background, card, text, text_secondary, border, notification
static CATALOG: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        Theme::builtin(
            DEFAULT_THEME_ID,
            "Default",
            ["#007AFF", "#F2F2F7", "#FFFFFF", "#000000", "#8E8E93", "#C6C6C8", "#FF3B30"],
            None,
        ),
        Theme::builtin(
            "dark",
            "Dark",
            ["#0A84FF", "#000000", "#1C1C1E", "#FFFFFF", "#98989F", "#38383A", "#FF453A"],
            None,
        ),
        Theme::builtin(
            "ocean",
            "Ocean",
            ["#0077B6", "#E0F4FF", "#FFFFFF", "#03045E", "#48698A", "#90E0EF", "#F94144"],
            Some("waves"),
        ),
        Theme::builtin(
            "forest",
            "Forest",
            ["#2D6A4F", "#EEF5EC", "#FFFFFF", "#1B4332", "#52796F", "#B7E4C7", "#D00000"],
            Some("leaves"),
        ),
        Theme::builtin(
            "sunset",
            "Sunset",
            ["#F3722C", "#FFF3E6", "#FFFFFF", "#3D1F0F", "#8C5E45", "#F9C74F", "#F94144"],
            Some("dusk"),
        ),
        Theme::builtin(
            "midnight",
            "Midnight",
            ["#BB86FC", "#121212", "#1E1E2E", "#E6E6F0", "#A0A0B8", "#2E2E42", "#CF6679"],
            Some("stars"),
        ),
    ]
});

/// All selectable themes, in display order.
pub fn catalog() -> &'static [Theme] {
    &CATALOG
}

/// Looks up a catalog theme by id.
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    CATALOG.iter().find(|theme| theme.id == id)
}

/// The bootstrap theme.
pub fn default_theme() -> &'static Theme {
    // The catalog always opens with the default entry
    &CATALOG[0]
}
