// dayhist/src/ui/theme.rs
//! Colors used for terminal output.
//!
//! Each logical part of the output (headers, values, warnings, ...) maps to
//! one foreground color. Colors are only applied when the target stream is a
//! terminal.

use owo_colors::AnsiColors;
use std::collections::HashMap;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    /// Table headers and section titles.
    Header,
    /// A sensor with a published value.
    Success,
    Info,
    Warn,
    Error,
    /// A sensor whose value is unknown.
    Unknown,
}

/// The style applied to one [`ThemeEntry`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThemeStyle {
    pub fg: Option<AnsiColors>,
}

/// Returns the default theme.
pub fn default_theme_map() -> ThemeMap {
    let mut theme = HashMap::new();
    theme.insert(ThemeEntry::Header, ThemeStyle { fg: Some(AnsiColors::BrightCyan) });
    theme.insert(ThemeEntry::Success, ThemeStyle { fg: Some(AnsiColors::Green) });
    theme.insert(ThemeEntry::Info, ThemeStyle { fg: Some(AnsiColors::Blue) });
    theme.insert(ThemeEntry::Warn, ThemeStyle { fg: Some(AnsiColors::Yellow) });
    theme.insert(ThemeEntry::Error, ThemeStyle { fg: Some(AnsiColors::Red) });
    theme.insert(ThemeEntry::Unknown, ThemeStyle { fg: Some(AnsiColors::BrightBlack) });
    theme
}

/// Looks up the foreground color for `entry`, defaulting to white.
pub fn color_for(theme: &ThemeMap, entry: ThemeEntry) -> AnsiColors {
    theme
        .get(&entry)
        .and_then(|style| style.fg)
        .unwrap_or(AnsiColors::White)
}

/// The comfy-table equivalent of the color for `entry`.
pub fn table_color(theme: &ThemeMap, entry: ThemeEntry) -> comfy_table::Color {
    use comfy_table::Color;
    match color_for(theme, entry) {
        AnsiColors::Black => Color::Black,
        AnsiColors::Red => Color::DarkRed,
        AnsiColors::Green => Color::DarkGreen,
        AnsiColors::Yellow => Color::DarkYellow,
        AnsiColors::Blue => Color::DarkBlue,
        AnsiColors::Magenta => Color::DarkMagenta,
        AnsiColors::Cyan => Color::DarkCyan,
        AnsiColors::White => Color::Grey,
        AnsiColors::BrightBlack => Color::DarkGrey,
        AnsiColors::BrightRed => Color::Red,
        AnsiColors::BrightGreen => Color::Green,
        AnsiColors::BrightYellow => Color::Yellow,
        AnsiColors::BrightBlue => Color::Blue,
        AnsiColors::BrightMagenta => Color::Magenta,
        AnsiColors::BrightCyan => Color::Cyan,
        AnsiColors::BrightWhite => Color::White,
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_covers_every_entry() {
        let theme = default_theme_map();
        for entry in [
            ThemeEntry::Header, ThemeEntry::Success, ThemeEntry::Info,
            ThemeEntry::Warn, ThemeEntry::Error, ThemeEntry::Unknown,
        ] {
            assert!(theme.contains_key(&entry), "missing {:?}", entry);
        }
        assert_eq!(color_for(&theme, ThemeEntry::Error), AnsiColors::Red);
    }

    #[test]
    fn table_colors_follow_the_theme() {
        let theme = default_theme_map();
        assert_eq!(table_color(&theme, ThemeEntry::Error), comfy_table::Color::DarkRed);
        assert_eq!(table_color(&theme, ThemeEntry::Unknown), comfy_table::Color::DarkGrey);
        assert_eq!(table_color(&theme, ThemeEntry::Header), comfy_table::Color::Cyan);
    }

    #[test]
    fn missing_entry_falls_back_to_white() {
        assert_eq!(color_for(&ThemeMap::new(), ThemeEntry::Warn), AnsiColors::White);
    }
}
