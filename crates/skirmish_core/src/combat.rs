//! Per-unit turn logic: find targets, move, attack.
//!
//! A turn runs in a fixed order:
//!
//! 1. If no living enemy exists anywhere, combat is over and the unit does
//!    nothing ([`TurnOutcome::CombatEnded`]).
//! 2. If an enemy is already adjacent, skip movement.
//! 3. Otherwise pick the nearest reachable open cell next to any enemy
//!    (ties by reading order) and take one step along the
//!    reading-order-smallest shortest path to it.
//! 4. Attack the adjacent enemy with the fewest hit points (ties by reading
//!    order). A target reduced to zero or below is removed from the board
//!    at once.
//!
//! The board is re-read at every step, so each unit sees the moves and
//! deaths caused by units that acted before it in the same round.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::Coord;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::pathfinding::{distances_from, first_step_toward};
use crate::units::{Unit, UnitId};

/// A single move made during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    /// Cell the unit left.
    pub from: Coord,
    /// Cell the unit entered.
    pub to: Coord,
}

/// A single attack made during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strike {
    /// Unit that attacked.
    pub attacker: UnitId,
    /// Target of the attack.
    pub target: UnitId,
    /// Damage dealt.
    pub damage: i32,
    /// Target hit points after the attack.
    pub remaining_hit_points: i32,
    /// Whether the attack killed the target.
    pub killed: bool,
}

/// Everything a unit did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnReport {
    /// The acting unit.
    pub unit: UnitId,
    /// Movement, if the unit moved.
    pub step: Option<Step>,
    /// Attack, if the unit attacked.
    pub strike: Option<Strike>,
}

/// Result of asking a unit to take its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The unit found no living enemies; the round stops here.
    CombatEnded,
    /// The unit took its turn.
    Acted(TurnReport),
}

/// Look up a unit by id.
pub fn unit(units: &[Unit], id: UnitId) -> Result<&Unit> {
    units.get(id.index()).ok_or(SimError::UnknownUnit(id))
}

fn unit_mut(units: &mut [Unit], id: UnitId) -> Result<&mut Unit> {
    units.get_mut(id.index()).ok_or(SimError::UnknownUnit(id))
}

/// All living units fighting against `faction`.
#[must_use]
pub fn targets_for(units: &[Unit], faction: Faction) -> Vec<UnitId> {
    units
        .iter()
        .filter(|u| u.is_alive() && u.faction != faction)
        .map(|u| u.id)
        .collect()
}

/// Living enemies of `faction` standing next to `pos`, in reading order.
pub fn adjacent_enemies(
    board: &Board,
    units: &[Unit],
    faction: Faction,
    pos: Coord,
) -> Result<Vec<UnitId>> {
    let mut enemies = Vec::new();
    for neighbor in board.neighbors(pos) {
        let Some(id) = board.occupant_at(neighbor)? else {
            continue;
        };
        let other = unit(units, id)?;
        if other.is_alive() && other.faction != faction {
            enemies.push(id);
        }
    }
    Ok(enemies)
}

/// Open cells from which one of `targets` could be attacked.
pub fn in_range_cells(
    board: &Board,
    units: &[Unit],
    targets: &[UnitId],
) -> Result<BTreeSet<Coord>> {
    let mut cells = BTreeSet::new();
    for &id in targets {
        cells.extend(board.open_neighbors(unit(units, id)?.position));
    }
    Ok(cells)
}

/// Next cell for a unit at `from` heading toward `targets`.
///
/// `None` if no in-range cell is reachable.
pub fn choose_step(
    board: &Board,
    units: &[Unit],
    from: Coord,
    targets: &[UnitId],
) -> Result<Option<Coord>> {
    let in_range = in_range_cells(board, units, targets)?;
    let distances = distances_from(board, from)?;

    let Some((destination, _)) = distances.nearest(in_range) else {
        return Ok(None);
    };

    first_step_toward(board, from, destination).map(Some)
}

/// Adjacent enemy to attack: fewest hit points, then reading order.
pub fn choose_attack_target(
    board: &Board,
    units: &[Unit],
    faction: Faction,
    pos: Coord,
) -> Result<Option<UnitId>> {
    let mut best: Option<(i32, Coord, UnitId)> = None;
    for id in adjacent_enemies(board, units, faction, pos)? {
        let target = unit(units, id)?;
        let key = (target.hit_points, target.position, id);
        if best.map_or(true, |current| key < current) {
            best = Some(key);
        }
    }
    Ok(best.map(|(_, _, id)| id))
}

/// Run one unit's full turn, mutating the board and unit list in place.
///
/// # Errors
///
/// Returns [`SimError::InvalidState`] if asked to act for a dead unit, and
/// propagates board faults (which indicate a corrupted simulation).
pub fn take_turn(board: &mut Board, units: &mut [Unit], id: UnitId) -> Result<TurnOutcome> {
    let who = unit(units, id)?;
    if !who.is_alive() {
        return Err(SimError::InvalidState(format!("dead unit {id} cannot act")));
    }
    let faction = who.faction;
    let attack_power = who.attack_power;
    let from = who.position;

    let targets = targets_for(units, faction);
    if targets.is_empty() {
        return Ok(TurnOutcome::CombatEnded);
    }

    let mut report = TurnReport {
        unit: id,
        step: None,
        strike: None,
    };

    if adjacent_enemies(board, units, faction, from)?.is_empty() {
        if let Some(to) = choose_step(board, units, from, &targets)? {
            board.vacate(from)?;
            board.place(id, to)?;
            unit_mut(units, id)?.position = to;
            report.step = Some(Step { from, to });
            tracing::trace!(unit = %id, %from, %to, "Unit moved");
        }
    }

    let pos = unit(units, id)?.position;
    if let Some(target_id) = choose_attack_target(board, units, faction, pos)? {
        let target = unit_mut(units, target_id)?;
        let killed = target.take_damage(attack_power);
        let remaining_hit_points = target.hit_points;
        let target_pos = target.position;

        if killed {
            board.vacate(target_pos)?;
            tracing::debug!(unit = %id, target = %target_id, at = %target_pos, "Unit killed");
        } else {
            tracing::trace!(unit = %id, target = %target_id, remaining_hit_points, "Unit attacked");
        }

        report.strike = Some(Strike {
            attacker: id,
            target: target_id,
            damage: attack_power,
            remaining_hit_points,
            killed,
        });
    }

    Ok(TurnOutcome::Acted(report))
}
