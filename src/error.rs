//! Error types for the Othello engine
//!
//! Only caller contract violations and configuration problems are errors.
//! Running out of moves or out of time is a normal search outcome.

use thiserror::Error;

use crate::board::Pos;

/// Errors that can occur when building positions, applying moves or
/// loading engine configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Board side length outside the supported range
    #[error("Invalid board size: {size} (must be even and between 4 and 16)")]
    InvalidBoardSize { size: usize },

    /// Move not present in the legal move list of the position
    #[error("Illegal move at ({}, {})", pos.row, pos.col)]
    IllegalMove { pos: Pos },

    /// Only Black or White can be asked to move
    #[error("Invalid player: {name}")]
    InvalidPlayer { name: &'static str },

    /// Coordinates outside the board
    #[error("Position ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// Textual board could not be parsed
    #[error("Board parse error: {message}")]
    Parse { message: String },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file is not valid TOML
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("Failed to serialize configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
