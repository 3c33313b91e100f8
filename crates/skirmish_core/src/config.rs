//! Combat tuning knobs.
//!
//! Configs are plain serde data so they can be kept next to map files as RON:
//!
//! ```ron
//! (
//!     starting_hit_points: 200,
//!     elf_attack_power: 3,
//!     goblin_attack_power: 3,
//!     max_rounds: Some(500),
//!     halt_on_casualty: None,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::units::{DEFAULT_ATTACK_POWER, DEFAULT_HIT_POINTS};

/// Parameters applied to every unit of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Hit points of every unit at the start.
    pub starting_hit_points: i32,
    /// Damage dealt by each Elf attack.
    pub elf_attack_power: i32,
    /// Damage dealt by each Goblin attack.
    pub goblin_attack_power: i32,
    /// Fail with [`SimError::RoundLimitExceeded`] if combat is still running
    /// after this many full rounds.
    pub max_rounds: Option<u32>,
    /// End the simulation as soon as this faction loses a unit.
    pub halt_on_casualty: Option<Faction>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            starting_hit_points: DEFAULT_HIT_POINTS,
            elf_attack_power: DEFAULT_ATTACK_POWER,
            goblin_attack_power: DEFAULT_ATTACK_POWER,
            max_rounds: None,
            halt_on_casualty: None,
        }
    }
}

impl CombatConfig {
    /// Load a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SimError::ConfigParse(format!("{}: {e}", path.display())))?;
        Self::from_ron_str(&contents)
    }

    /// Parse a config from a RON string and validate it.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron).map_err(|e| SimError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Attack power of units fighting for `faction`.
    #[must_use]
    pub const fn attack_power(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Elf => self.elf_attack_power,
            Faction::Goblin => self.goblin_attack_power,
        }
    }

    /// Copy of this config with a different attack power for `faction`.
    #[must_use]
    pub fn with_attack_power(mut self, faction: Faction, power: i32) -> Self {
        match faction {
            Faction::Elf => self.elf_attack_power = power,
            Faction::Goblin => self.goblin_attack_power = power,
        }
        self
    }

    /// Reject values that would stall or corrupt a simulation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for non-positive hit points or
    /// attack power.
    pub fn validate(&self) -> Result<()> {
        if self.starting_hit_points <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "starting_hit_points must be positive, got {}",
                self.starting_hit_points
            )));
        }
        for faction in Faction::ALL {
            let power = self.attack_power(faction);
            if power <= 0 {
                return Err(SimError::InvalidConfig(format!(
                    "{faction} attack power must be positive, got {power}"
                )));
            }
        }
        Ok(())
    }
}
