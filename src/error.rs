use std::path::PathBuf;

use thiserror::Error;

/// Problems detected before the game loop starts. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no levels configured")]
    NoLevels,

    #[error("numLives must be at least 1, got {0}")]
    InvalidLives(i32),

    #[error("level {level}: invalid {field}: {reason}")]
    InvalidLevel {
        level: usize,
        field: &'static str,
        reason: String,
    },

    #[error("invalid map: {0}")]
    Map(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("level {level} is out of range ({levels} configured)")]
    LevelOutOfRange { level: usize, levels: usize },
}
