//! # Skirmish Core
//!
//! Deterministic grid combat simulation core.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering beyond plain text
//! - No IO (maps arrive as rows of glyphs)
//! - No randomness
//!
//! Two factions, Elves and Goblins, take turns in reading order (top to
//! bottom, then left to right). Each unit moves one step toward the nearest
//! enemy it can reach and attacks the weakest adjacent enemy, until one
//! faction is gone.
//!
//! ## Crate Structure
//!
//! - [`coord`] - Grid coordinates and reading order
//! - [`board`] - Grid topology and occupancy
//! - [`pathfinding`] - Shortest paths with reading-order tie-breaks
//! - [`combat`] - Per-unit turn logic
//! - [`simulation`] - Rounds, termination and outcome
//! - [`config`] - Combat tuning knobs
//! - [`tuning`] - Search for a flawless Elf victory

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod board;
pub mod combat;
pub mod config;
pub mod coord;
pub mod error;
pub mod factions;
pub mod pathfinding;
pub mod simulation;
pub mod tuning;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::board::{Board, Cell};
    pub use crate::combat::{Step, Strike, TurnOutcome, TurnReport};
    pub use crate::config::CombatConfig;
    pub use crate::coord::Coord;
    pub use crate::error::{Result, SimError};
    pub use crate::factions::Faction;
    pub use crate::pathfinding::{distances_from, first_step_toward, DistanceMap};
    pub use crate::simulation::{EndReason, Outcome, RoundEvents, SimState, Simulation};
    pub use crate::tuning::{attempt_config, minimum_flawless_power, TuningResult};
    pub use crate::units::{Unit, UnitId};
}
