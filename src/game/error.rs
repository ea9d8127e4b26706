//! Board Errors
//!
//! Every variant is recoverable: callers either pre-validate or log the
//! error at warn level and carry on with a consistent board.

use crate::core::coord::Coord;
use crate::game::piece::BombKind;

/// Errors raised by board operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Coordinate lies outside the grid.
    #[error("coordinate {at} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending coordinate
        at: Coord,
        /// Grid width
        width: i32,
        /// Grid height
        height: i32,
    },

    /// No piece where one was required.
    #[error("no piece at {0}")]
    InvalidPiece(Coord),

    /// Attempt to put a piece on an obstacle tile.
    #[error("tile at {0} is an obstacle and cannot hold a piece")]
    ObstacleSlot(Coord),

    /// No-match fill gave up after the retry ceiling.
    #[error("fill at {at} still forms a match after {attempts} attempts")]
    UnsatisfiableFill {
        /// Slot being filled
        at: Coord,
        /// Attempts made
        attempts: u32,
    },

    /// Bomb kind with no detonation policy.
    #[error("{0:?} bombs have no detonation policy")]
    UnimplementedBombKind(BombKind),

    /// Configuration rejected by validation.
    #[error("invalid board config: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
