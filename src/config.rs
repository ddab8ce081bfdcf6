use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::sampler::DEFAULT_TEST_SIZE;
use crate::store::json_store::JsonStore;

const MAX_TEST_SIZE: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// `bundled`, a file path, or an http(s) URL.
    #[serde(default = "default_questions")]
    pub questions: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_test_size")]
    pub test_size: usize,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_questions() -> String {
    "bundled".to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_test_size() -> usize {
    DEFAULT_TEST_SIZE
}
fn default_data_dir() -> String {
    JsonStore::default_dir().to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            theme: default_theme(),
            test_size: default_test_size(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
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

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have put out of range.
    pub fn validate(&mut self) {
        self.test_size = self.test_size.clamp(1, MAX_TEST_SIZE);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.questions.trim().is_empty() {
            self.questions = default_questions();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.questions, "bundled");
        assert_eq!(config.test_size, 15);
        assert_eq!(config.theme, "terminal-default");
        assert!(config.data_dir.contains("quizdr"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
questions = "https://example.com/questions.json"
test_size = 25
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.questions, "https://example.com/questions.json");
        assert_eq!(config.test_size, 25);
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.questions, deserialized.questions);
        assert_eq!(config.test_size, deserialized.test_size);
        assert_eq!(config.data_dir, deserialized.data_dir);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.test_size = 0;
        config.questions = "  ".to_string();
        config.data_dir = String::new();
        config.validate();
        assert_eq!(config.test_size, 1);
        assert_eq!(config.questions, "bundled");
        assert!(!config.data_dir.is_empty());

        config.test_size = 5000;
        config.validate();
        assert_eq!(config.test_size, 100);
    }
}
