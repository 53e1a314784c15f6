use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::operation::Operation;
use crate::generator::DigitLevel;

/// Question counts offered on the quiz setup screen.
pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_digit_level")]
    pub digit_level: u8,
    #[serde(default = "default_operation")]
    pub operation: Operation,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub celebrations: bool,
}

fn default_question_count() -> u32 {
    5
}
fn default_digit_level() -> u8 {
    1
}
fn default_operation() -> Operation {
    Operation::Add
}
fn default_theme() -> String {
    "classroom".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            digit_level: default_digit_level(),
            operation: default_operation(),
            theme: default_theme(),
            sound: default_true(),
            celebrations: default_true(),
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
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathkids")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory for user theme files that override the bundled ones.
    pub fn themes_dir() -> PathBuf {
        Self::config_dir().join("themes")
    }

    /// Resets out-of-range values to their defaults. Call after loading a
    /// hand-edited or older file.
    pub fn normalize(&mut self) {
        if !QUESTION_COUNTS.contains(&self.question_count) {
            self.question_count = default_question_count();
        }
        if DigitLevel::try_from(self.digit_level).is_err() {
            self.digit_level = default_digit_level();
        }
        if !self.operation.is_quiz_operation() {
            self.operation = default_operation();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn level(&self) -> DigitLevel {
        DigitLevel::try_from(self.digit_level).unwrap_or(DigitLevel::One)
    }

    pub fn set_level(&mut self, level: DigitLevel) {
        self.digit_level = level.into();
    }

    /// Next entry of [`QUESTION_COUNTS`], wrapping around.
    pub fn cycle_question_count(&mut self) {
        let pos = QUESTION_COUNTS
            .iter()
            .position(|&n| n == self.question_count)
            .map_or(0, |i| (i + 1) % QUESTION_COUNTS.len());
        self.question_count = QUESTION_COUNTS[pos];
    }

    pub fn cycle_question_count_back(&mut self) {
        let n = QUESTION_COUNTS.len();
        let pos = QUESTION_COUNTS
            .iter()
            .position(|&c| c == self.question_count)
            .map_or(0, |i| (i + n - 1) % n);
        self.question_count = QUESTION_COUNTS[pos];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.question_count, 5);
        assert_eq!(config.level(), DigitLevel::One);
        assert_eq!(config.theme, "classroom");
        assert!(config.sound);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
question_count = 10
operation = "multiply"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.operation, Operation::Multiply);
        assert_eq!(config.digit_level, 1);
        assert!(config.celebrations);
    }

    #[test]
    fn test_normalize_resets_out_of_range() {
        let mut config = Config {
            question_count: 7,
            digit_level: 9,
            operation: Operation::Divide,
            theme: "  ".to_string(),
            sound: false,
            celebrations: true,
        };
        config.normalize();
        assert_eq!(config.question_count, 5);
        assert_eq!(config.digit_level, 1);
        assert_eq!(config.operation, Operation::Add);
        assert_eq!(config.theme, "classroom");
        assert!(!config.sound);
    }

    #[test]
    fn test_normalize_keeps_valid_values() {
        let mut config = Config {
            question_count: 20,
            digit_level: 3,
            operation: Operation::Subtract,
            theme: "chalkboard".to_string(),
            sound: true,
            celebrations: false,
        };
        let before = config.clone();
        config.normalize();
        assert_eq!(config, before);
    }

    #[test]
    fn test_cycle_question_count_wraps() {
        let mut config = Config::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            config.cycle_question_count();
            seen.push(config.question_count);
        }
        assert_eq!(seen, vec![10, 15, 20, 5, 10]);

        config.cycle_question_count_back();
        config.cycle_question_count_back();
        assert_eq!(config.question_count, 20);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.question_count = 15;
        config.set_level(DigitLevel::Three);
        config.sound = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
