//! Battle reports for terminal and JSON output.

use serde::{Deserialize, Serialize};
use skirmish_core::config::CombatConfig;
use skirmish_core::simulation::{EndReason, Simulation};
use skirmish_core::tuning::TuningResult;

/// A unit still standing when the battle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorReport {
    /// Faction glyph.
    pub faction: char,
    /// Final `(row, column)`.
    pub position: (u32, u32),
    /// Remaining hit points.
    pub hit_points: i32,
}

/// Complete result of a single battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Map the battle was fought on.
    pub map: String,
    /// Rules in effect.
    pub config: CombatConfig,
    /// Fully completed rounds.
    pub rounds_completed: u32,
    /// Hit points left across all survivors.
    pub remaining_hit_points: i64,
    /// `rounds_completed * remaining_hit_points`.
    pub score: i64,
    /// Winning faction name, if the battle ran to the end.
    pub winner: Option<String>,
    /// How the battle ended.
    pub end_reason: String,
    /// Survivors in reading order.
    pub survivors: Vec<SurvivorReport>,
    /// Final board with hit point annotations.
    pub final_board: Vec<String>,
    /// Final simulation state hash (for determinism validation).
    pub final_state_hash: u64,
}

impl BattleReport {
    /// Summarize a finished simulation.
    ///
    /// Returns `None` while combat is still running.
    #[must_use]
    pub fn from_simulation(map: impl Into<String>, sim: &Simulation) -> Option<Self> {
        let outcome = sim.outcome()?;

        let mut survivors: Vec<SurvivorReport> = sim
            .living_units()
            .map(|u| SurvivorReport {
                faction: u.faction.glyph(),
                position: (u.position.row, u.position.column),
                hit_points: u.hit_points,
            })
            .collect();
        survivors.sort_by_key(|s| s.position);

        let end_reason = match outcome.end_reason {
            EndReason::Victory(faction) => format!("{faction} win"),
            EndReason::Casualty(faction) => format!("{faction} lost a unit"),
        };

        Some(Self {
            map: map.into(),
            config: sim.config().clone(),
            rounds_completed: outcome.rounds_completed,
            remaining_hit_points: outcome.remaining_hit_points,
            score: outcome.score,
            winner: outcome.winner.map(|f| f.display_name().to_string()),
            end_reason,
            survivors,
            final_board: sim
                .render_with_hit_points()
                .lines()
                .map(str::to_string)
                .collect(),
            final_state_hash: sim.state_hash(),
        })
    }

    /// Human-readable summary in the classic puzzle layout.
    #[must_use]
    pub fn render_text(&self, show_board: bool) -> String {
        let mut lines = Vec::new();
        if show_board {
            lines.extend(self.final_board.iter().cloned());
            lines.push(String::new());
        }

        lines.push(format!(
            "Combat ends after {} full rounds",
            self.rounds_completed
        ));
        match &self.winner {
            Some(winner) => lines.push(format!(
                "{winner} win with {} total hit points left",
                self.remaining_hit_points
            )),
            None => lines.push(format!("Halted: {}", self.end_reason)),
        }
        lines.push(format!(
            "Outcome: {} * {} = {}",
            self.rounds_completed, self.remaining_hit_points, self.score
        ));

        lines.join("\n")
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of a flawless-power search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningReport {
    /// Smallest Elf attack power with no Elf losses.
    pub attack_power: i32,
    /// Number of battles simulated.
    pub attempts: u32,
    /// The winning battle.
    pub battle: BattleReport,
}

impl TuningReport {
    /// Combine a tuning result with the report of its winning battle.
    #[must_use]
    pub fn new(result: &TuningResult, battle: BattleReport) -> Self {
        Self {
            attack_power: result.attack_power,
            attempts: result.attempts,
            battle,
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub fn render_text(&self, show_board: bool) -> String {
        format!(
            "Elves need attack power {} ({} attempts)\n{}",
            self.attack_power,
            self.attempts,
            self.battle.render_text(show_board)
        )
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Hashes from repeated runs of one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Map that was replayed.
    pub map: String,
    /// Final state hash of each run.
    pub hashes: Vec<u64>,
    /// Score of each run.
    pub scores: Vec<i64>,
}

impl VerifyReport {
    /// Whether every run ended in the same state.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_test_utils::fixtures::CORRIDOR_DUEL;

    fn finished_duel() -> Simulation {
        let mut sim = Simulation::from_rows(CORRIDOR_DUEL).unwrap();
        sim.run().unwrap();
        sim
    }

    #[test]
    fn test_report_requires_finished_battle() {
        let sim = Simulation::from_rows(CORRIDOR_DUEL).unwrap();
        assert!(BattleReport::from_simulation("duel", &sim).is_none());
    }

    #[test]
    fn test_report_fields() {
        let report = BattleReport::from_simulation("duel", &finished_duel()).unwrap();

        assert_eq!(report.rounds_completed, 67);
        assert_eq!(report.score, 134);
        assert_eq!(report.winner.as_deref(), Some("Elves"));
        assert_eq!(
            report.survivors,
            vec![SurvivorReport {
                faction: 'E',
                position: (1, 2),
                hit_points: 2
            }]
        );
        assert_eq!(report.final_board[1], "#.E.#   E(2)");
    }

    #[test]
    fn test_render_text() {
        let report = BattleReport::from_simulation("duel", &finished_duel()).unwrap();
        let text = report.render_text(false);

        assert_eq!(
            text,
            "Combat ends after 67 full rounds\n\
             Elves win with 2 total hit points left\n\
             Outcome: 67 * 2 = 134"
        );
        assert!(report.render_text(true).starts_with("#####\n#.E.#"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = BattleReport::from_simulation("duel", &finished_duel()).unwrap();
        let json = report.to_json().unwrap();
        let parsed: BattleReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_verify_report() {
        let report = VerifyReport {
            map: "duel".into(),
            hashes: vec![7, 7, 7],
            scores: vec![134, 134, 134],
        };
        assert!(report.is_deterministic());

        let report = VerifyReport {
            hashes: vec![7, 8],
            ..report
        };
        assert!(!report.is_deterministic());
    }
}
