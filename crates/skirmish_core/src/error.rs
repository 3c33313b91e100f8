//! Error types for the combat simulation.

use thiserror::Error;

use crate::coord::Coord;
use crate::units::UnitId;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for all combat simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The map could not be turned into a board.
    #[error("Malformed map at row {row}, column {column}: {message}")]
    MalformedInput {
        /// Row of the offending character (or line).
        row: usize,
        /// Column of the offending character.
        column: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A coordinate query fell outside the grid extent.
    #[error("Coordinate {0} is outside the board")]
    OutOfBounds(Coord),

    /// `first_step_toward` was asked for a goal it cannot reach.
    #[error("No path from {start} to {goal}")]
    UnreachableGoal {
        /// Where the search started.
        start: Coord,
        /// The goal that was not reachable.
        goal: Coord,
    },

    /// Invalid unit identifier.
    #[error("Unknown unit: {0}")]
    UnknownUnit(UnitId),

    /// Board and unit list disagree, or an operation was used out of order.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),

    /// Configuration values are out of range.
    #[error("Invalid combat config: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("Failed to parse combat config: {0}")]
    ConfigParse(String),

    /// The configured round cap was reached before combat ended.
    #[error("Combat still running after {0} rounds")]
    RoundLimitExceeded(u32),

    /// Tuning ran out of attack power values to try.
    #[error("No flawless victory for attack power up to {0}")]
    NoFlawlessVictory(i32),
}
