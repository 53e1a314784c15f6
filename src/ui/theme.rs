use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::operation::Operation;
use crate::feedback::Tone;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub add: String,
    pub subtract: String,
    pub multiply: String,
    pub divide: String,
    /// Carry digits written above a column.
    pub carry: String,
    /// Crossed-out and borrowed digits.
    pub borrow: String,
    /// Digits in the answer row.
    pub answer: String,
}

impl Theme {
    /// Looks in the user's theme directory first, then the bundled themes.
    pub fn load(name: &str) -> Option<Self> {
        let user_theme_path = Config::themes_dir().join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => log::warn!("ignoring theme {}: {e}", user_theme_path.display()),
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("classroom").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fdf6e3".to_string(),
            fg: "#3b3a4a".to_string(),
            muted: "#93a1a1".to_string(),
            accent: "#6c5ce7".to_string(),
            accent_dim: "#d8d2f7".to_string(),
            border: "#c9c3b0".to_string(),
            border_focused: "#6c5ce7".to_string(),
            header_bg: "#6c5ce7".to_string(),
            header_fg: "#ffffff".to_string(),
            bar_filled: "#00b894".to_string(),
            bar_empty: "#eee8d5".to_string(),
            error: "#d63031".to_string(),
            warning: "#e17055".to_string(),
            success: "#00b894".to_string(),
            add: "#00b894".to_string(),
            subtract: "#0984e3".to_string(),
            multiply: "#e17055".to_string(),
            divide: "#a55eea".to_string(),
            carry: "#e84393".to_string(),
            borrow: "#d63031".to_string(),
            answer: "#0984e3".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn carry(&self) -> Color { Self::parse_color(&self.carry) }
    pub fn borrow(&self) -> Color { Self::parse_color(&self.borrow) }
    pub fn answer(&self) -> Color { Self::parse_color(&self.answer) }

    /// The colour each operation is drawn in on cards and headers.
    pub fn operation(&self, op: Operation) -> Color {
        match op {
            Operation::Add => Self::parse_color(&self.add),
            Operation::Subtract => Self::parse_color(&self.subtract),
            Operation::Multiply => Self::parse_color(&self.multiply),
            Operation::Divide => Self::parse_color(&self.divide),
        }
    }

    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Info => self.fg(),
            Tone::Correct => self.success(),
            Tone::Wrong => self.error(),
            Tone::Warn => self.warning(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("00b894"), Color::Rgb(0, 184, 148));
        assert_eq!(ThemeColors::parse_color("#fff"), Color::White);
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"classroom".to_string()));
        assert!(names.contains(&"chalkboard".to_string()));
        for name in names {
            let file = ThemeAssets::get(&format!("{name}.toml")).unwrap();
            let content = std::str::from_utf8(file.data.as_ref()).unwrap();
            let theme: Theme = toml::from_str(content).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_unknown_theme_is_none() {
        assert!(Theme::load("no-such-theme-anywhere").is_none());
    }

    #[test]
    fn test_operation_colors_differ() {
        let colors = ThemeColors::default();
        assert_ne!(
            colors.operation(Operation::Add),
            colors.operation(Operation::Subtract)
        );
    }
}
