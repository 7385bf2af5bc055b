//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML documents; two Catppuccin variants are embedded in the
//! binary and custom themes can be loaded from a file. Colors are `#rrggbb`
//! strings, validated when the theme is parsed, so rendering never has to
//! deal with a malformed color.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme (default)
//! - `catppuccin-latte`: Light theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#cba6f7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#cba6f7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! size_fg = "#a6e3a1"
//! refreshing_fg = "#fab387"
//! error_fg = "#f38ba8"
//! ```

use crate::domain::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A 24-bit color parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color {s:?}, expected #rrggbb"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color {s:?}: {e}"))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: Rgb,
    #[serde(default)]
    pub header_bg: Option<Rgb>,

    pub selection_fg: Rgb,
    pub selection_bg: Rgb,

    pub text_normal: Rgb,
    /// Footer, column headers and the COVER column.
    pub text_dim: Rgb,

    pub border: Rgb,

    pub search_bar_border: Rgb,
    pub match_highlight_fg: Rgb,
    pub match_highlight_bg: Rgb,

    pub empty_state_fg: Rgb,

    /// SIZE column.
    pub size_fg: Rgb,
    /// Header while a forced refresh is in flight.
    pub refreshing_fg: Rgb,
    /// Error status messages.
    pub error_fg: Rgb,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` if the name is unknown.
    ///
    /// ```rust
    /// use gameshelf::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(theme_name = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Io`] if the file cannot be read and
    /// [`ShelfError::Theme`] if it is not a valid theme (bad syntax, missing
    /// field, malformed color).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses a theme from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Theme`] if the document is not a valid theme.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ShelfError::Theme(e.to_string()))
    }

    /// ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(color: &Rgb) -> String {
        format!("\u{001b}[38;2;{};{};{}m", color.r, color.g, color.b)
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(color: &Rgb) -> String {
        format!("\u{001b}[48;2;{};{};{}m", color.r, color.g, color.b)
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim, etc.).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    ///
    /// # Panics
    ///
    /// Panics if the embedded theme fails to parse, which the theme tests rule out.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha")
            .expect("built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        for name in ["catppuccin-mocha", "catppuccin-latte"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::default().name, "catppuccin-mocha");
    }

    #[test]
    fn parses_hex_colors() {
        let color: Rgb = "#1e1e2e".parse().unwrap();
        assert_eq!(color, Rgb { r: 0x1e, g: 0x1e, b: 0x2e });
        assert_eq!(color.to_string(), "#1e1e2e");
        assert_eq!(Theme::fg(&color), "\u{1b}[38;2;30;30;46m");
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
        assert!("#é12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn bad_color_in_file_is_theme_error() {
        let mocha = include_str!("../../themes/catppuccin-mocha.toml");
        let broken = mocha.replacen("#cdd6f4", "#nothex", 1);
        assert!(matches!(Theme::from_toml(&broken), Err(ShelfError::Theme(_))));
    }

    #[test]
    fn loads_theme_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../themes/catppuccin-latte.toml").as_bytes())
            .unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "catppuccin-latte");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Theme::from_file(dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ShelfError::Io(_))));
    }
}
