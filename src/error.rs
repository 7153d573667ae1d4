//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Out-of-range grid access. Validation runs before every write, so hitting
/// this means a logic bug rather than a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the {width}x{height} board")]
    OutOfBounds {
        row: i32,
        col: i32,
        width: usize,
        height: usize,
    },
}

/// Failures of the score database. Never fatal for the game loop.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a data directory for the score database")]
    NoDataDir,
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Failures reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
