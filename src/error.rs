//! Error types shared by the maze core and the settings store.

use thiserror::Error;

/// Errors produced while configuring or building a maze.
///
/// Walls, out-of-bounds moves and reaching the finish are ordinary control
/// flow and never surface here.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Grid size, seed or difficulty outside the documented table.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A caller broke a contract, e.g. asked for the direction between two
    /// cells that are not neighbours.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing the settings file failed.
    #[error("settings i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for [`crate::settings::Settings`].
    #[error("settings format error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
