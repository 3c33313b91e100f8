//! Headless runner for grid skirmish maps.
//!
//! Loads maps from disk, fights them out with [`skirmish_core`] and reports
//! the result as text or JSON:
//!
//! - **run**: one battle, optionally with overridden rules
//! - **tune**: the weakest Elf attack power that wins without losses
//! - **verify**: repeated runs compared by final state hash
//!
//! Reports go to stdout, logs to stderr.
//!
//! # Example
//!
//! ```bash
//! cargo run -p skirmish_headless -- run --map maps/opening.txt --show-board
//! cargo run -p skirmish_headless -- tune --map maps/opening.txt --json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod map_loader;
pub mod report;
pub mod runner;

pub use map_loader::{load_rows, MapError};
pub use report::{BattleReport, TuningReport, VerifyReport};
pub use runner::{run_battle, tune, verify, BattleOptions, ReportError};
