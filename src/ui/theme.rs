use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "cosmic-night";

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
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub card_back: String,
    pub card_face: String,
    pub planet_locked: String,
    pub planet_open: String,
    pub planet_done: String,
    #[serde(default = "default_fireworks")]
    pub fireworks: Vec<String>,
}

fn default_fireworks() -> Vec<String> {
    ["#fbbf24", "#f472b6", "#60a5fa", "#34d399", "#a78bfa"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones
        let user_theme_path = Config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(err) => {
                    tracing::warn!(path = %user_theme_path.display(), %err, "Ignoring invalid theme")
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#0b1026".to_string(),
            fg: "#e2e8f0".to_string(),
            muted: "#64748b".to_string(),
            accent: "#818cf8".to_string(),
            accent_dim: "#312e81".to_string(),
            border: "#334155".to_string(),
            header_bg: "#1e1b4b".to_string(),
            header_fg: "#e0e7ff".to_string(),
            bar_filled: "#818cf8".to_string(),
            bar_empty: "#1e293b".to_string(),
            error: "#f87171".to_string(),
            warning: "#fbbf24".to_string(),
            success: "#34d399".to_string(),
            card_back: "#4338ca".to_string(),
            card_face: "#f8fafc".to_string(),
            planet_locked: "#475569".to_string(),
            planet_open: "#fbbf24".to_string(),
            planet_done: "#34d399".to_string(),
            fireworks: default_fireworks(),
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
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn card_back(&self) -> Color { Self::parse_color(&self.card_back) }
    pub fn card_face(&self) -> Color { Self::parse_color(&self.card_face) }
    pub fn planet_locked(&self) -> Color { Self::parse_color(&self.planet_locked) }
    pub fn planet_open(&self) -> Color { Self::parse_color(&self.planet_open) }
    pub fn planet_done(&self) -> Color { Self::parse_color(&self.planet_done) }

    pub fn firework(&self, index: usize) -> Color {
        match self.fireworks.len() {
            0 => self.accent(),
            n => Self::parse_color(&self.fireworks[index % n]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&DEFAULT_THEME.to_string()));
        for name in names {
            let theme = Theme::load(&name).unwrap_or_else(|| panic!("theme {name} failed to load"));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn parse_color_falls_back_to_white() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn firework_palette_wraps() {
        let colors = ThemeColors::default();
        assert_eq!(colors.firework(0), colors.firework(colors.fireworks.len()));
    }
}
