//! Round scheduling, termination and outcome.
//!
//! A [`Simulation`] owns the board and the dense unit list for one run and
//! mutates both in place. Each call to [`Simulation::step_round`] plays one
//! round:
//!
//! - The turn order is fixed once, at the start of the round, by sorting the
//!   living units on their current positions in reading order. The order is
//!   kept by identity, so a unit that moves mid-round keeps its slot.
//! - Units that die before their slot are skipped.
//! - If any unit finds no living enemies, combat ends immediately and the
//!   partial round does not count.
//!
//! # Determinism
//!
//! There is no randomness and no hash-map iteration on the simulation path,
//! so the same map and config always produce the same [`state_hash`]
//! sequence.
//!
//! [`state_hash`]: Simulation::state_hash
//!
//! # Example
//!
//! ```
//! use skirmish_core::simulation::Simulation;
//!
//! let mut sim: Simulation = "#######\n#E..G.#\n#######".parse().unwrap();
//! let outcome = sim.run().unwrap();
//! assert_eq!(outcome.score, outcome.rounds_completed as i64 * outcome.remaining_hit_points);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::combat::{take_turn, unit, TurnOutcome, TurnReport};
use crate::config::CombatConfig;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::units::{Unit, UnitId};

/// Why a simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// A unit of this faction found no enemies left.
    Victory(Faction),
    /// This faction lost a unit while `halt_on_casualty` named it.
    Casualty(Faction),
}

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimState {
    /// Rounds can still be played.
    Running,
    /// Terminal; no further rounds.
    Ended(EndReason),
}

/// Final tally of a finished simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// Rounds in which every scheduled unit got to act.
    pub rounds_completed: u32,
    /// Sum of hit points over all living units of either faction.
    pub remaining_hit_points: i64,
    /// `rounds_completed * remaining_hit_points`.
    pub score: i64,
    /// Faction left standing, if combat ran to the end.
    pub winner: Option<Faction>,
    /// Why the simulation stopped.
    pub end_reason: EndReason,
}

/// Everything that happened during one call to [`Simulation::step_round`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEvents {
    /// 1-based number of the round that was played.
    pub round: u32,
    /// Reports of the units that acted, in turn order.
    pub turns: Vec<TurnReport>,
    /// False if combat ended before every scheduled unit acted.
    pub completed: bool,
}

impl RoundEvents {
    /// Units killed during the round, in the order they fell.
    pub fn deaths(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.turns
            .iter()
            .filter_map(|turn| turn.strike)
            .filter(|strike| strike.killed)
            .map(|strike| strike.target)
    }
}

/// A single skirmish from initial map to last survivor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    board: Board,
    units: Vec<Unit>,
    config: CombatConfig,
    rounds_completed: u32,
    state: SimState,
}

impl Simulation {
    /// Build a simulation from map rows with the default config.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInput`] if the map cannot be parsed or
    /// holds no units.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        Self::with_config(rows, CombatConfig::default())
    }

    /// Build a simulation from map rows.
    ///
    /// Units get ids in reading order of their starting cells.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a bad config and
    /// [`SimError::MalformedInput`] if the map cannot be parsed or holds no
    /// units.
    pub fn with_config<S: AsRef<str>>(rows: &[S], config: CombatConfig) -> Result<Self> {
        config.validate()?;

        let (mut board, spawns) = Board::parse(rows)?;
        if spawns.is_empty() {
            return Err(SimError::MalformedInput {
                row: 0,
                column: 0,
                message: "map has no units".to_string(),
            });
        }

        let mut units = Vec::with_capacity(spawns.len());
        for (index, spawn) in spawns.into_iter().enumerate() {
            let raw = u32::try_from(index)
                .map_err(|_| SimError::InvalidState("too many units".to_string()))?;
            let id = UnitId(raw);
            board.place(id, spawn.position)?;
            units.push(Unit::new(
                id,
                spawn.faction,
                spawn.position,
                config.starting_hit_points,
                config.attack_power(spawn.faction),
            ));
        }

        tracing::debug!(
            width = board.width(),
            height = board.height(),
            units = units.len(),
            "Simulation created"
        );

        Ok(Self {
            board,
            units,
            config,
            rounds_completed: 0,
            state: SimState::Running,
        })
    }

    /// The board in its current state.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Every unit ever spawned, dead ones included, indexed by [`UnitId`].
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Units still alive, in id order.
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Config the simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Number of fully completed rounds so far.
    #[must_use]
    pub const fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SimState {
        self.state
    }

    /// Returns true until combat has ended.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, SimState::Running)
    }

    /// Sum of hit points over all living units.
    #[must_use]
    pub fn remaining_hit_points(&self) -> i64 {
        self.living_units().map(|u| i64::from(u.hit_points)).sum()
    }

    /// Living units sorted by reading order of their positions.
    #[must_use]
    pub fn turn_order(&self) -> Vec<UnitId> {
        let mut living: Vec<&Unit> = self.living_units().collect();
        living.sort_by_key(|u| u.position);
        living.into_iter().map(|u| u.id).collect()
    }

    /// Play one round.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if combat already ended, and
    /// propagates internal faults from the turn engine.
    pub fn step_round(&mut self) -> Result<RoundEvents> {
        if let SimState::Ended(reason) = self.state {
            return Err(SimError::InvalidState(format!(
                "combat already ended: {reason:?}"
            )));
        }

        let mut events = RoundEvents {
            round: self.rounds_completed + 1,
            ..RoundEvents::default()
        };

        for id in self.turn_order() {
            let acting = unit(&self.units, id)?;
            if !acting.is_alive() {
                continue;
            }
            let faction = acting.faction;

            match take_turn(&mut self.board, &mut self.units, id)? {
                TurnOutcome::CombatEnded => {
                    self.finish(EndReason::Victory(faction));
                    return Ok(events);
                }
                TurnOutcome::Acted(report) => {
                    events.turns.push(report);

                    #[cfg(feature = "debug-validation")]
                    self.validate()?;

                    if let Some(strike) = report.strike.filter(|strike| strike.killed) {
                        let lost = unit(&self.units, strike.target)?.faction;
                        if self.config.halt_on_casualty == Some(lost) {
                            self.finish(EndReason::Casualty(lost));
                            return Ok(events);
                        }
                    }
                }
            }
        }

        self.rounds_completed += 1;
        events.completed = true;

        tracing::debug!(
            round = self.rounds_completed,
            remaining_hit_points = self.remaining_hit_points(),
            state_hash = self.state_hash(),
            "Round completed"
        );

        Ok(events)
    }

    /// Play rounds until combat ends.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::RoundLimitExceeded`] if `max_rounds` is configured
    /// and combat completes a round beyond it, and propagates
    /// [`step_round`](Self::step_round) faults. A battle that ends after
    /// exactly `max_rounds` full rounds still succeeds, since the round in
    /// which it ends is never counted.
    pub fn run(&mut self) -> Result<Outcome> {
        while self.is_running() {
            self.step_round()?;

            if let Some(limit) = self.config.max_rounds {
                if self.is_running() && self.rounds_completed > limit {
                    return Err(SimError::RoundLimitExceeded(limit));
                }
            }
        }

        self.outcome()
            .ok_or_else(|| SimError::InvalidState("simulation stopped without outcome".into()))
    }

    /// Final tally, once combat has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        let SimState::Ended(end_reason) = self.state else {
            return None;
        };

        let remaining_hit_points = self.remaining_hit_points();
        Some(Outcome {
            rounds_completed: self.rounds_completed,
            remaining_hit_points,
            score: i64::from(self.rounds_completed) * remaining_hit_points,
            winner: match end_reason {
                EndReason::Victory(faction) => Some(faction),
                EndReason::Casualty(_) => None,
            },
            end_reason,
        })
    }

    fn finish(&mut self, reason: EndReason) {
        self.state = SimState::Ended(reason);
        tracing::info!(
            rounds = self.rounds_completed,
            remaining_hit_points = self.remaining_hit_points(),
            ?reason,
            "Combat ended"
        );
    }

    /// Check that the board and unit list agree.
    ///
    /// Every living unit must sit on a cell holding its id, and every
    /// occupied cell must hold a living unit standing there.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] describing the first mismatch.
    pub fn validate(&self) -> Result<()> {
        for u in self.living_units() {
            if self.board.occupant_at(u.position)? != Some(u.id) {
                return Err(SimError::InvalidState(format!(
                    "unit {} is not on its cell {}",
                    u.id, u.position
                )));
            }
        }

        for pos in self.board.coords() {
            if let Cell::Occupied(id) = self.board.cell(pos)? {
                let occupant = unit(&self.units, id)?;
                if !occupant.is_alive() || occupant.position != pos {
                    return Err(SimError::InvalidState(format!(
                        "cell {pos} holds {id}, which is dead or elsewhere"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rounds_completed.hash(&mut hasher);
        self.state.hash(&mut hasher);
        self.units.hash(&mut hasher);
        self.board.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the simulation state.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| SimError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize simulation state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the restored board and
    /// units disagree.
    pub fn restore(data: &[u8]) -> Result<Self> {
        let sim: Self = bincode::deserialize(data).map_err(|e| {
            SimError::InvalidState(format!("Failed to deserialize simulation: {e}"))
        })?;
        sim.validate()?;
        Ok(sim)
    }

    /// The board as map glyphs.
    #[must_use]
    pub fn render(&self) -> String {
        self.board.render(&self.units)
    }

    /// The board with each row followed by its units' hit points,
    /// e.g. `#G.E#   G(200), E(197)`.
    #[must_use]
    pub fn render_with_hit_points(&self) -> String {
        (0..self.board.height())
            .map(|row| {
                let mut line = self.board.render_row(row, &self.units);
                let mut in_row: Vec<&Unit> =
                    self.living_units().filter(|u| u.position.row == row).collect();
                in_row.sort_by_key(|u| u.position);

                if !in_row.is_empty() {
                    let stats: Vec<String> = in_row
                        .iter()
                        .map(|u| format!("{}({})", u.faction.glyph(), u.hit_points))
                        .collect();
                    line.push_str("   ");
                    line.push_str(&stats.join(", "));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromStr for Simulation {
    type Err = SimError;

    /// Parse a whole map with the default config.
    ///
    /// Trailing whitespace is trimmed from each line and blank lines are
    /// skipped.
    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }
}
