//! Error types for the game simulation.
//!
//! Command gateway failures are grouped into the categories callers care
//! about (see [`ErrorCategory`]). Tick pipeline steps never return errors.

use thiserror::Error;

use crate::grid::Coord;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Broad classification of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Absent input, out-of-bounds coordinates or wrong owning player.
    Validation,
    /// Unit already busy, or destination occupied at commit time.
    StateConflict,
    /// Target not adjacent / not reachable, or outside fire range.
    Range,
    /// Not enough ammunition.
    Resource,
    /// No path exists.
    Path,
    /// Map documents, files and other IO.
    Input,
    /// Shared state could not be accessed.
    Internal,
}

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Coordinates outside the grid.
    #[error("tile ({}, {}) not found", .0.x, .0.y)]
    TileNotFound(Coord),

    /// The source tile has no unit.
    #[error("no unit on tile ({}, {})", .0.x, .0.y)]
    NoUnit(Coord),

    /// The unit belongs to another player.
    #[error("unit belongs to player {owner}, not player {player}")]
    WrongPlayer {
        /// Owner of the unit.
        owner: u8,
        /// Player that issued the command.
        player: u8,
    },

    /// The unit already processes an activity.
    #[error("unit is already processing a command")]
    UnitBusy,

    /// The unit has no attributes yet and cannot move.
    #[error("unit is not ready")]
    NotReady,

    /// Destination terrain cannot be entered by this unit kind.
    #[error("invalid target for this unit")]
    InvalidTarget,

    /// Target tile is outside fire range.
    #[error("target is not in range")]
    OutOfRange,

    /// Target is not a neighbor and no path leads there.
    #[error("target is not a neighbor and no path was found")]
    NoPath,

    /// Less than one round of ammunition.
    #[error("no ammunition")]
    NoAmmunition,

    /// Map document could not be turned into a world.
    #[error("invalid map: {0}")]
    MapFormat(String),

    /// IO failure while reading or writing documents.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A thread panicked while holding the world lock.
    #[error("world lock poisoned")]
    LockPoisoned,
}

impl GameError {
    /// Classify this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::TileNotFound(_) | Self::NoUnit(_) | Self::WrongPlayer { .. } => {
                ErrorCategory::Validation
            }
            Self::UnitBusy | Self::NotReady => ErrorCategory::StateConflict,
            Self::InvalidTarget | Self::OutOfRange => ErrorCategory::Range,
            Self::NoAmmunition => ErrorCategory::Resource,
            Self::NoPath => ErrorCategory::Path,
            Self::MapFormat(_) | Self::Io(_) | Self::Json(_) | Self::Serialization(_) => {
                ErrorCategory::Input
            }
            Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
