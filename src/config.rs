use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::GhostMode;

/// One value per ghost mode.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeTable<T> {
    pub chase: T,
    pub scatter: T,
}

impl<T: Copy> ModeTable<T> {
    pub fn get(&self, mode: GhostMode) -> T {
        match mode {
            GhostMode::Chase => self.chase,
            GhostMode::Scatter => self.scatter,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelConfig {
    #[serde(rename = "pacmanSpeed")]
    pub pacman_speed: f64,
    #[serde(rename = "ghostSpeed")]
    pub ghost_speed: ModeTable<f64>,
    /// Mode durations in ticks.
    #[serde(rename = "modeLengths")]
    pub mode_lengths: ModeTable<u32>,
}

impl LevelConfig {
    pub fn validate(&self, level: usize) -> Result<(), ConfigError> {
        check_speed(level, "pacmanSpeed", self.pacman_speed)?;
        check_speed(level, "ghostSpeed.chase", self.ghost_speed.chase)?;
        check_speed(level, "ghostSpeed.scatter", self.ghost_speed.scatter)?;
        check_mode_length(level, "modeLengths.chase", self.mode_lengths.chase)?;
        check_mode_length(level, "modeLengths.scatter", self.mode_lengths.scatter)?;
        Ok(())
    }
}

fn check_speed(level: usize, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::InvalidLevel {
        level,
        field,
        reason: format!("speed must be a positive number, got {value}"),
    })
}

fn check_mode_length(level: usize, field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value >= 1 {
        return Ok(());
    }
    Err(ConfigError::InvalidLevel {
        level,
        field,
        reason: "mode length must be at least one tick".to_string(),
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GameConfig {
    #[serde(rename = "mapFile", alias = "map")]
    pub map_file: PathBuf,
    #[serde(rename = "numLives")]
    pub num_lives: i32,
    pub levels: Vec<LevelConfig>,
}

impl GameConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and validates a configuration file. A relative `mapFile` is
    /// resolved against the configuration file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&raw)?;
        if config.map_file.is_relative() {
            if let Some(parent) = path.parent() {
                config.map_file = parent.join(&config.map_file);
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.num_lives < 1 {
            return Err(ConfigError::InvalidLives(self.num_lives));
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    const SAMPLE: &str = r#"{
        "mapFile": "map.txt",
        "numLives": 3,
        "levels": [
            {
                "pacmanSpeed": 1.2,
                "ghostSpeed": { "chase": 1.0, "scatter": 0.8 },
                "modeLengths": { "chase": 20, "scatter": 10 }
            }
        ]
    }"#;

    #[test]
    fn parses_sample_configuration() {
        let config = GameConfig::from_json_str(SAMPLE).expect("sample parses");
        assert_eq!(config.map_file, PathBuf::from("map.txt"));
        assert_eq!(config.num_lives, 3);
        assert_eq!(config.levels.len(), 1);
        let level = &config.levels[0];
        assert_eq!(level.ghost_speed.get(GhostMode::Scatter), 0.8);
        assert_eq!(level.mode_lengths.get(GhostMode::Chase), 20);
        config.validate().expect("sample is valid");
    }

    #[test]
    fn accepts_legacy_map_key() {
        let raw = SAMPLE.replace("\"mapFile\"", "\"map\"");
        let config = GameConfig::from_json_str(&raw).expect("legacy key parses");
        assert_eq!(config.map_file, PathBuf::from("map.txt"));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let raw = SAMPLE.replace("\"pacmanSpeed\": 1.2,", "");
        let error = GameConfig::from_json_str(&raw).expect_err("missing field rejected");
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().contains("pacmanSpeed"));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let raw = SAMPLE.replace("\"numLives\": 3", "\"numLives\": \"three\"");
        assert!(matches!(
            GameConfig::from_json_str(&raw),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn empty_levels_are_rejected() {
        let raw = r#"{ "mapFile": "map.txt", "numLives": 3, "levels": [] }"#;
        let config = GameConfig::from_json_str(raw).expect("shape is valid");
        assert!(matches!(config.validate(), Err(ConfigError::NoLevels)));
    }

    #[test]
    fn non_positive_speed_names_level_and_field() {
        let raw = SAMPLE.replace("\"chase\": 1.0", "\"chase\": 0.0");
        let config = GameConfig::from_json_str(&raw).expect("shape is valid");
        match config.validate() {
            Err(ConfigError::InvalidLevel { level, field, .. }) => {
                assert_eq!(level, 0);
                assert_eq!(field, "ghostSpeed.chase");
            }
            other => panic!("unexpected validation result: {other:?}"),
        }
    }

    #[test]
    fn zero_mode_length_is_rejected() {
        let raw = SAMPLE.replace("\"scatter\": 10", "\"scatter\": 0");
        let config = GameConfig::from_json_str(&raw).expect("shape is valid");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLevel {
                field: "modeLengths.scatter",
                ..
            })
        ));
    }

    #[test]
    fn load_resolves_map_relative_to_config() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("maze-chase-config-{now}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.json");
        fs::write(&path, SAMPLE).expect("write config");

        let config = GameConfig::load(&path).expect("config loads");
        assert_eq!(config.map_file, dir.join("map.txt"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("maze-chase-missing").join("config.json");
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
