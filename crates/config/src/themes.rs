//! Display theme registry.
//!
//! Themes are defined as Rust values and compiled once into a `OnceLock`
//! registry. Nothing reached from the initializer may call back into
//! [`themes()`], or initialization would re-enter the lock and deadlock.
use std::{collections::HashMap, sync::OnceLock};

use tracing::warn;

use crate::parse_rgb;

/// Name of the theme used when none is configured or the configured one is unknown.
pub const DEFAULT_THEME: &str = "default";

/// An RGB triple.
pub type Rgb = (u8, u8, u8);

/// Colors used by the terminal UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Registry name.
    pub name: &'static str,
    /// Regular body text.
    pub fg: Rgb,
    /// Pane titles and headings.
    pub primary: Rgb,
    /// Secondary labels such as namespaces and tags.
    pub secondary: Rgb,
    /// Border of unfocused panes.
    pub border: Rgb,
    /// Border of the focused pane.
    pub focused_border: Rgb,
    /// Foreground of the selected row.
    pub selected_fg: Rgb,
    /// Background of the selected row.
    pub selected_bg: Rgb,
    /// Informational notices.
    pub info: Rgb,
    /// Error notices.
    pub error: Rgb,
    /// De-emphasized text such as footers and help hints.
    pub muted: Rgb,
}

/// All available themes.
fn themes() -> &'static HashMap<&'static str, Theme> {
    static THEMES: OnceLock<HashMap<&'static str, Theme>> = OnceLock::new();
    THEMES.get_or_init(|| {
        fn rgb(s: &str) -> Rgb {
            parse_rgb(s).unwrap_or((255, 255, 255))
        }

        fn theme_default() -> Theme {
            Theme {
                name: "default",
                fg: rgb("#d0d0d0"),
                primary: rgb("#7aa2f7"),
                secondary: rgb("#bb9af7"),
                border: rgb("#43414d"),
                focused_border: rgb("#7aa2f7"),
                selected_fg: rgb("white"),
                selected_bg: rgb("#2c3471"),
                info: rgb("#8bff8b"),
                error: rgb("#ff6666"),
                muted: rgb("#808080"),
            }
        }

        fn theme_charcoal() -> Theme {
            Theme {
                name: "charcoal",
                fg: rgb("white"),
                primary: rgb("white"),
                secondary: rgb("#b0b0b0"),
                border: rgb("#404040"),
                focused_border: rgb("#a0a0a0"),
                selected_fg: rgb("white"),
                selected_bg: rgb("#505050"),
                info: rgb("#8bff8b"),
                error: rgb("#ff6666"),
                muted: rgb("#707070"),
            }
        }

        fn theme_solarized_dark() -> Theme {
            Theme {
                name: "solarized-dark",
                fg: rgb("#839496"),
                primary: rgb("#268bd2"),
                secondary: rgb("#2aa198"),
                border: rgb("#073642"),
                focused_border: rgb("#268bd2"),
                selected_fg: rgb("#fdf6e3"),
                selected_bg: rgb("#073642"),
                info: rgb("#859900"),
                error: rgb("#dc322f"),
                muted: rgb("#586e75"),
            }
        }

        let mut themes = HashMap::new();
        for theme in [theme_default(), theme_charcoal(), theme_solarized_dark()] {
            themes.insert(theme.name, theme);
        }
        themes
    })
}

/// Look up a theme by name, falling back to the default theme.
///
/// `None` selects the default silently; an unknown name logs a warning.
pub fn theme(name: Option<&str>) -> Theme {
    let name = name.unwrap_or(DEFAULT_THEME);
    if let Some(theme) = themes().get(name) {
        return *theme;
    }
    warn!(theme = name, "unknown theme, using default");
    themes()
        .get(DEFAULT_THEME)
        .copied()
        .unwrap_or_else(fallback_theme)
}

/// List all available theme names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = themes().keys().copied().collect();
    names.sort_unstable();
    names
}

/// Check if a theme exists.
pub fn theme_exists(name: &str) -> bool {
    themes().contains_key(name)
}

/// Last-resort theme when the registry is missing its default entry.
fn fallback_theme() -> Theme {
    let white = (255, 255, 255);
    Theme {
        name: DEFAULT_THEME,
        fg: white,
        primary: white,
        secondary: white,
        border: white,
        focused_border: white,
        selected_fg: (0, 0, 0),
        selected_bg: white,
        info: white,
        error: white,
        muted: white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_builtin_themes() {
        assert_eq!(names(), vec!["charcoal", "default", "solarized-dark"]);
        assert!(theme_exists("charcoal"));
        assert!(!theme_exists("neon"));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(theme(Some("neon")).name, "default");
        assert_eq!(theme(None).name, "default");
        assert_eq!(theme(Some("solarized-dark")).name, "solarized-dark");
    }

    #[test]
    fn colors_are_parsed() {
        let t = theme(Some("solarized-dark"));
        assert_eq!(t.error, (0xdc, 0x32, 0x2f));
        assert_eq!(theme(Some("charcoal")).fg, (255, 255, 255));
    }
}
