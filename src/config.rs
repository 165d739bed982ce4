use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::Timings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_match_reveal_ms")]
    pub match_reveal_ms: u64,
    #[serde(default = "default_mismatch_hide_ms")]
    pub mismatch_hide_ms: u64,
    #[serde(default)]
    pub word_bank_path: Option<PathBuf>,
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    #[serde(default = "default_target_locale")]
    pub target_locale: String,
    #[serde(default = "default_remarks_enabled")]
    pub remarks_enabled: bool,
    #[serde(default = "default_remark_model")]
    pub remark_model: String,
    #[serde(default = "default_remark_api_key_env")]
    pub remark_api_key_env: String,
    #[serde(default)]
    pub speech_program: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "cosmic-night".to_string()
}
fn default_settle_delay_ms() -> u64 {
    1800
}
fn default_match_reveal_ms() -> u64 {
    500
}
fn default_mismatch_hide_ms() -> u64 {
    1000
}
fn default_source_locale() -> String {
    "ru-RU".to_string()
}
fn default_target_locale() -> String {
    "en-US".to_string()
}
fn default_remarks_enabled() -> bool {
    true
}
fn default_remark_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_remark_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            settle_delay_ms: default_settle_delay_ms(),
            match_reveal_ms: default_match_reveal_ms(),
            mismatch_hide_ms: default_mismatch_hide_ms(),
            word_bank_path: None,
            source_locale: default_source_locale(),
            target_locale: default_target_locale(),
            remarks_enabled: default_remarks_enabled(),
            remark_model: default_remark_model(),
            remark_api_key_env: default_remark_api_key_env(),
            speech_program: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocab-quest")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp delays into playable ranges and restore blank strings to defaults.
    pub fn validate(&mut self) {
        self.settle_delay_ms = self.settle_delay_ms.clamp(200, 10_000);
        self.match_reveal_ms = self.match_reveal_ms.clamp(100, 5_000);
        self.mismatch_hide_ms = self.mismatch_hide_ms.clamp(200, 5_000);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
        if self.speech_program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.speech_program = None;
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            settle: Duration::from_millis(self.settle_delay_ms),
            match_reveal: Duration::from_millis(self.match_reveal_ms),
            mismatch_hide: Duration::from_millis(self.mismatch_hide_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settle_delay_ms, 1800);
        assert_eq!(config.remark_api_key_env, "GEMINI_API_KEY");
        assert!(config.word_bank_path.is_none());
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
theme = "terminal-default"
source_locale = "de-DE"
word_bank_path = "/tmp/words.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.source_locale, "de-DE");
        assert_eq!(config.word_bank_path, Some(PathBuf::from("/tmp/words.json")));
        assert_eq!(config.target_locale, "en-US");
        assert!(config.remarks_enabled);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.speech_program = Some("say".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_validate_clamps_delays() {
        let mut config = Config::default();
        config.settle_delay_ms = 0;
        config.match_reveal_ms = 60_000;
        config.theme = "  ".to_string();
        config.speech_program = Some(String::new());
        config.validate();
        assert_eq!(config.settle_delay_ms, 200);
        assert_eq!(config.match_reveal_ms, 5_000);
        assert_eq!(config.theme, "cosmic-night");
        assert!(config.speech_program.is_none());
    }

    #[test]
    fn test_load_from_file_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mismatch_hide_ms = 1\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mismatch_hide_ms, 200);
        assert_eq!(config.timings().mismatch_hide, Duration::from_millis(200));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
