//! Configuration persistence for the word game.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::quiz::DEFAULT_QUESTION_COUNT;
use crate::speech::SpeechOptions;

/// Application configuration that persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The currently selected theme name.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Upper bound on questions per quiz.
    #[serde(default = "default_question_count")]
    pub question_count: usize,

    /// Read words aloud when a card or listening question appears.
    #[serde(default = "default_true")]
    pub auto_play: bool,

    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Text-to-speech settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Synthesizer program; detected from PATH when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(flatten)]
    pub options: SpeechOptions,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            options: SpeechOptions::default(),
        }
    }
}

fn default_theme() -> String {
    "sunny".to_string()
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            question_count: default_question_count(),
            auto_play: true,
            speech: SpeechConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordgame")
            .join("config.toml")
    }

    /// Load config from disk, returning default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config file")?;
        // A zero-question quiz would be indistinguishable from an empty unit.
        config.question_count = config.question_count.max(1);

        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("wordgame-config-{}", Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.question_count, 10);
        assert!(config.speech.enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "theme = \"chalkboard\"\n\n[speech]\nrate = 0.8\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme, "chalkboard");
        assert_eq!(config.question_count, 10);
        assert_eq!(config.speech.options.rate, 0.8);
        assert_eq!(config.speech.options.lang, "en-US");

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path();
        let mut config = Config::default();
        config.question_count = 5;
        config.speech.command = Some("espeak".into());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_zero_question_count_is_raised() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "question_count = 0\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().question_count, 1);
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
