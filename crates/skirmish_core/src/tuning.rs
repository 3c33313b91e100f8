//! Search for the weakest Elf attack power that wins without losses.

use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::simulation::{EndReason, Outcome, Simulation};

/// Smallest flawless attack power and the battle it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningResult {
    /// Elf attack power that first wins with every Elf alive.
    pub attack_power: i32,
    /// Outcome of the winning battle.
    pub outcome: Outcome,
    /// Number of battles simulated, the winning one included.
    pub attempts: u32,
}

/// Rules for one tuning attempt: `base` with the given Elf attack power,
/// halting at the first Elf death.
///
/// Replaying a [`TuningResult`] with this config reproduces its battle.
#[must_use]
pub fn attempt_config(base: &CombatConfig, elf_attack_power: i32) -> CombatConfig {
    CombatConfig {
        halt_on_casualty: Some(Faction::Elf),
        ..base.clone()
    }
    .with_attack_power(Faction::Elf, elf_attack_power)
}

/// Raise Elf attack power one step at a time until the Elves win without a
/// single casualty.
///
/// The search starts one above `base.elf_attack_power`. Each attempt is a
/// fresh simulation that halts as soon as an Elf dies. Once attack power
/// reaches the starting hit points every blow kills, so the search stops
/// there.
///
/// # Errors
///
/// Returns [`SimError::NoFlawlessVictory`] if no power up to the cap works,
/// and propagates map, config and round-limit errors from the attempts.
pub fn minimum_flawless_power<S: AsRef<str>>(
    rows: &[S],
    base: &CombatConfig,
) -> Result<TuningResult> {
    base.validate()?;

    let first = base.elf_attack_power.saturating_add(1);
    let cap = base.starting_hit_points.max(first);
    let mut attempts = 0;

    for power in first..=cap {
        attempts += 1;
        let outcome = Simulation::with_config(rows, attempt_config(base, power))?.run()?;
        if outcome.end_reason == EndReason::Victory(Faction::Elf) {
            tracing::info!(attack_power = power, score = outcome.score, "Flawless victory found");
            return Ok(TuningResult {
                attack_power: power,
                outcome,
                attempts,
            });
        }

        tracing::debug!(attack_power = power, reason = ?outcome.end_reason, "Attempt failed");
    }

    Err(SimError::NoFlawlessVictory(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_classic_power() {
        let rows = [
            "#######", //
            "#.G...#",
            "#...EG#",
            "#.#.#G#",
            "#..G#E#",
            "#.....#",
            "#######",
        ];
        let result = minimum_flawless_power(&rows, &CombatConfig::default()).unwrap();

        assert_eq!(result.attack_power, 15);
        assert_eq!(result.outcome.rounds_completed, 29);
        assert_eq!(result.outcome.remaining_hit_points, 172);
        assert_eq!(result.outcome.score, 4988);
        assert_eq!(result.attempts, 12);
    }

    #[test]
    fn test_attempt_config_replays_result() {
        let rows = [
            "#######", //
            "#.G...#",
            "#...EG#",
            "#.#.#G#",
            "#..G#E#",
            "#.....#",
            "#######",
        ];
        let base = CombatConfig {
            halt_on_casualty: Some(Faction::Goblin),
            ..CombatConfig::default()
        };
        let result = minimum_flawless_power(&rows, &base).unwrap();

        let config = attempt_config(&base, result.attack_power);
        assert_eq!(config.halt_on_casualty, Some(Faction::Elf));
        assert_eq!(config.elf_attack_power, 15);

        let replayed = Simulation::with_config(&rows, config).unwrap().run().unwrap();
        assert_eq!(replayed, result.outcome);
    }

    #[test]
    fn test_unwinnable_map_exhausts_search() {
        // No elves at all: the goblins always win.
        let config = CombatConfig {
            starting_hit_points: 10,
            ..CombatConfig::default()
        };
        assert_eq!(
            minimum_flawless_power(&["#G.G#"], &config),
            Err(SimError::NoFlawlessVictory(10))
        );
    }

    #[test]
    fn test_rejects_bad_base_config() {
        let config = CombatConfig {
            starting_hit_points: 0,
            ..CombatConfig::default()
        };
        assert!(matches!(
            minimum_flawless_power(&["#EG#"], &config),
            Err(SimError::InvalidConfig(_))
        ));
    }
}
