//! Combatants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::factions::Faction;

/// Hit points every unit starts with unless configured otherwise.
pub const DEFAULT_HIT_POINTS: i32 = 200;

/// Attack power every unit has unless configured otherwise.
pub const DEFAULT_ATTACK_POWER: i32 = 3;

/// Slot of a unit in the simulation's dense unit list.
///
/// Ids are assigned in reading order of the starting map and are never
/// reused, so a dead unit keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Index into the unit list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A faction-tagged combatant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier.
    pub id: UnitId,
    /// Side this unit fights for.
    pub faction: Faction,
    /// Remaining hit points; zero or below means dead.
    pub hit_points: i32,
    /// Damage dealt per attack.
    pub attack_power: i32,
    /// Current cell. Meaningless once the unit is dead.
    pub position: Coord,
}

impl Unit {
    /// Create a unit at full health.
    #[must_use]
    pub const fn new(
        id: UnitId,
        faction: Faction,
        position: Coord,
        hit_points: i32,
        attack_power: i32,
    ) -> Self {
        Self {
            id,
            faction,
            hit_points,
            attack_power,
            position,
        }
    }

    /// Whether the unit still takes turns.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Whether `other` fights for the opposing faction.
    #[must_use]
    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.faction != other.faction
    }

    /// Subtract `damage` and report whether this blow was fatal.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.hit_points = self.hit_points.saturating_sub(damage);
        !self.is_alive()
    }
}
