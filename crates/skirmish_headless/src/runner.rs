//! Command implementations shared by the binary and its tests.

use std::path::{Path, PathBuf};

use skirmish_core::config::CombatConfig;
use skirmish_core::error::SimError;
use skirmish_core::factions::Faction;
use skirmish_core::simulation::Simulation;
use skirmish_core::tuning::{attempt_config, minimum_flawless_power};
use thiserror::Error;

use crate::map_loader::{load_rows, MapError};
use crate::report::{BattleReport, TuningReport, VerifyReport};

/// Error type for headless commands.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Map could not be loaded.
    #[error(transparent)]
    Map(#[from] MapError),
    /// Simulation or config fault.
    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),
    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    /// Repeated runs disagreed.
    #[error("Determinism check failed: {0} distinct final states")]
    NonDeterministic(usize),
}

/// Inputs for a single battle.
#[derive(Debug, Clone, Default)]
pub struct BattleOptions {
    /// Map file.
    pub map: PathBuf,
    /// Optional RON config file.
    pub config: Option<PathBuf>,
    /// Override for Elf attack power.
    pub elf_power: Option<i32>,
    /// Override for the round limit.
    pub max_rounds: Option<u32>,
}

impl BattleOptions {
    /// Options for `map` with default rules.
    pub fn new(map: impl Into<PathBuf>) -> Self {
        Self {
            map: map.into(),
            ..Self::default()
        }
    }

    /// Resolve the effective config: file first, then command line overrides.
    pub fn combat_config(&self) -> Result<CombatConfig, ReportError> {
        let mut config = match &self.config {
            Some(path) => CombatConfig::load(path)?,
            None => CombatConfig::default(),
        };

        if let Some(power) = self.elf_power {
            config = config.with_attack_power(Faction::Elf, power);
        }
        if self.max_rounds.is_some() {
            config.max_rounds = self.max_rounds;
        }

        config.validate()?;
        Ok(config)
    }
}

fn map_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Fight one battle to the end.
pub fn run_battle(options: &BattleOptions) -> Result<BattleReport, ReportError> {
    let rows = load_rows(&options.map)?;
    let config = options.combat_config()?;
    let name = map_name(&options.map);

    tracing::info!(map = %name, elf_power = config.elf_attack_power, "Starting battle");

    let mut sim = Simulation::with_config(&rows, config)?;
    sim.run()?;

    BattleReport::from_simulation(name, &sim)
        .ok_or_else(|| SimError::InvalidState("battle finished without outcome".into()).into())
}

/// Find the weakest Elf attack power that wins without losses.
pub fn tune(options: &BattleOptions) -> Result<TuningReport, ReportError> {
    let rows = load_rows(&options.map)?;
    let base = options.combat_config()?;
    let name = map_name(&options.map);

    tracing::info!(
        map = %name,
        from = base.elf_attack_power.saturating_add(1),
        "Tuning Elf attack power"
    );

    let result = minimum_flawless_power(&rows, &base)?;

    // Replay the winning battle under the search's own rules to capture its final board.
    let mut sim = Simulation::with_config(&rows, attempt_config(&base, result.attack_power))?;
    sim.run()?;

    let battle = BattleReport::from_simulation(name, &sim)
        .ok_or_else(|| SimError::InvalidState("battle finished without outcome".into()))?;
    Ok(TuningReport::new(&result, battle))
}

/// Run the same battle `runs` times and compare final states.
pub fn verify(options: &BattleOptions, runs: u32) -> Result<VerifyReport, ReportError> {
    let rows = load_rows(&options.map)?;
    let config = options.combat_config()?;

    let mut report = VerifyReport {
        map: map_name(&options.map),
        hashes: Vec::new(),
        scores: Vec::new(),
    };

    for run in 0..runs {
        let mut sim = Simulation::with_config(&rows, config.clone())?;
        let outcome = sim.run()?;
        let hash = sim.state_hash();
        tracing::debug!(run, hash = %format!("{hash:016x}"), score = outcome.score, "Run complete");

        report.hashes.push(hash);
        report.scores.push(outcome.score);
    }

    if !report.is_deterministic() {
        let mut distinct = report.hashes.clone();
        distinct.sort_unstable();
        distinct.dedup();
        return Err(ReportError::NonDeterministic(distinct.len()));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_test_utils::fixtures::{CORRIDOR_DUEL, OPENING};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn map_file(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_run_battle_opening() {
        let file = map_file(OPENING.rows);
        let report = run_battle(&BattleOptions::new(file.path())).unwrap();

        assert_eq!(report.rounds_completed, 47);
        assert_eq!(report.remaining_hit_points, 590);
        assert_eq!(report.score, 27730);
        assert_eq!(report.winner.as_deref(), Some("Goblins"));
    }

    #[test]
    fn test_elf_power_override() {
        let file = map_file(OPENING.rows);
        let options = BattleOptions {
            elf_power: Some(15),
            ..BattleOptions::new(file.path())
        };

        let report = run_battle(&options).unwrap();
        assert_eq!(report.score, 4988);
        assert_eq!(report.config.elf_attack_power, 15);
    }

    #[test]
    fn test_config_file() {
        let file = map_file(OPENING.rows);
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, "(elf_attack_power: 15)").unwrap();

        let options = BattleOptions {
            config: Some(config.path().to_path_buf()),
            ..BattleOptions::new(file.path())
        };
        assert_eq!(run_battle(&options).unwrap().score, 4988);
    }

    #[test]
    fn test_round_limit() {
        let file = map_file(OPENING.rows);
        let options = BattleOptions {
            max_rounds: Some(10),
            ..BattleOptions::new(file.path())
        };

        assert!(matches!(
            run_battle(&options),
            Err(ReportError::Sim(SimError::RoundLimitExceeded(10)))
        ));
    }

    #[test]
    fn test_invalid_override() {
        let file = map_file(OPENING.rows);
        let options = BattleOptions {
            elf_power: Some(0),
            ..BattleOptions::new(file.path())
        };

        assert!(matches!(
            run_battle(&options),
            Err(ReportError::Sim(SimError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_malformed_map() {
        let file = map_file(&["#####", "#E?G#", "#####"]);
        assert!(matches!(
            run_battle(&BattleOptions::new(file.path())),
            Err(ReportError::Sim(SimError::MalformedInput { .. }))
        ));
    }

    #[test]
    fn test_tune_opening() {
        let file = map_file(OPENING.rows);
        let report = tune(&BattleOptions::new(file.path())).unwrap();

        assert_eq!(report.attack_power, 15);
        assert_eq!(report.attempts, 12);
        assert_eq!(report.battle.score, 4988);
        assert_eq!(report.battle.winner.as_deref(), Some("Elves"));
    }

    #[test]
    fn test_tune_reports_the_flawless_battle() {
        let file = map_file(OPENING.rows);
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, "(halt_on_casualty: Some(Goblin))").unwrap();

        let options = BattleOptions {
            config: Some(config.path().to_path_buf()),
            ..BattleOptions::new(file.path())
        };
        let report = tune(&options).unwrap();

        assert_eq!(report.attack_power, 15);
        assert_eq!(report.battle.score, 4988);
        assert_eq!(report.battle.winner.as_deref(), Some("Elves"));
        assert_eq!(report.battle.end_reason, "Elves win");
    }

    #[test]
    fn test_tune_from_maximum_power() {
        let file = map_file(CORRIDOR_DUEL);
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, "(elf_attack_power: {})", i32::MAX).unwrap();

        let options = BattleOptions {
            config: Some(config.path().to_path_buf()),
            ..BattleOptions::new(file.path())
        };
        let report = tune(&options).unwrap();

        assert_eq!(report.attack_power, i32::MAX);
        assert_eq!(report.attempts, 1);
        assert_eq!(report.battle.rounds_completed, 1);
        assert_eq!(report.battle.score, 200);
    }

    #[test]
    fn test_verify_runs() {
        let file = map_file(OPENING.rows);
        let report = verify(&BattleOptions::new(file.path()), 3).unwrap();

        assert_eq!(report.hashes.len(), 3);
        assert!(report.is_deterministic());
        assert_eq!(report.scores, vec![27730; 3]);
    }

    #[test]
    fn test_bundled_maps() {
        let maps = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../maps");
        let options = BattleOptions {
            config: Some(maps.join("flawless.ron")),
            ..BattleOptions::new(maps.join("opening.txt"))
        };

        let report = run_battle(&options).unwrap();
        assert_eq!(report.score, 4988);
        assert_eq!(report.map, "opening");
    }
}
