use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

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
    pub text_dim: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub option_picked: String,
    pub option_correct: String,
    pub option_correct_bg: String,
    pub option_incorrect: String,
    pub option_incorrect_bg: String,
    pub chip_selected_bg: String,
    pub chip_selected_fg: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("quizdr")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => log::warn!("ignoring {}: {e}", user_theme_path.display()),
                }
            }
        }

        // Try bundled themes
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
        Self::load("terminal-default").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#020617".to_string(),
            fg: "#f1f5f9".to_string(),
            text_dim: "#94a3b8".to_string(),
            accent: "#10b981".to_string(),
            accent_dim: "#334155".to_string(),
            border: "#1e293b".to_string(),
            border_focused: "#0ea5e9".to_string(),
            header_bg: "#0f172a".to_string(),
            header_fg: "#f1f5f9".to_string(),
            bar_filled: "#6366f1".to_string(),
            bar_empty: "#1e293b".to_string(),
            option_picked: "#38bdf8".to_string(),
            option_correct: "#6ee7b7".to_string(),
            option_correct_bg: "#064e3b".to_string(),
            option_incorrect: "#fda4af".to_string(),
            option_incorrect_bg: "#4c0519".to_string(),
            chip_selected_bg: "#0284c7".to_string(),
            chip_selected_fg: "#f8fafc".to_string(),
            error: "#fb7185".to_string(),
            warning: "#fbbf24".to_string(),
            success: "#34d399".to_string(),
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
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn option_picked(&self) -> Color { Self::parse_color(&self.option_picked) }
    pub fn option_correct(&self) -> Color { Self::parse_color(&self.option_correct) }
    pub fn option_correct_bg(&self) -> Color { Self::parse_color(&self.option_correct_bg) }
    pub fn option_incorrect(&self) -> Color { Self::parse_color(&self.option_incorrect) }
    pub fn option_incorrect_bg(&self) -> Color { Self::parse_color(&self.option_incorrect_bg) }
    pub fn chip_selected_bg(&self) -> Color { Self::parse_color(&self.chip_selected_bg) }
    pub fn chip_selected_fg(&self) -> Color { Self::parse_color(&self.chip_selected_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_and_rejects_garbage() {
        assert_eq!(ThemeColors::parse_color("#10b981"), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(ThemeColors::parse_color("10b981"), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::White);
        assert_eq!(ThemeColors::parse_color("#fff"), Color::White);
    }

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"terminal-default".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn unknown_theme_is_none() {
        assert!(Theme::load("no-such-theme").is_none());
    }
}
