//! Shortest paths over open floor with reading-order tie-breaks.
//!
//! Every step costs 1, so a label-setting search is equivalent to
//! breadth-first search. The frontier is still a priority queue keyed on
//! `(distance, Coord)` so that equidistant cells are expanded in reading
//! order and the search visits cells in the same sequence on every run.
//!
//! Only [`Cell::Open`](crate::board::Cell::Open) cells are entered. The
//! source may be occupied (it is normally the moving unit's own cell).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::board::Board;
use crate::coord::Coord;
use crate::error::{Result, SimError};

/// Step distances from one source cell.
///
/// Unreachable cells are absent. Iteration is in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    source: Coord,
    distances: BTreeMap<Coord, u32>,
}

impl DistanceMap {
    /// The cell the search started from.
    #[must_use]
    pub const fn source(&self) -> Coord {
        self.source
    }

    /// Distance to `pos`, or `None` if it cannot be reached.
    #[must_use]
    pub fn get(&self, pos: Coord) -> Option<u32> {
        self.distances.get(&pos).copied()
    }

    /// Returns true if `pos` is reachable.
    #[must_use]
    pub fn contains(&self, pos: Coord) -> bool {
        self.distances.contains_key(&pos)
    }

    /// Number of reachable cells, including the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns true if nothing was reached (never the case for a valid source).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Reachable cells and their distances in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, u32)> + '_ {
        self.distances.iter().map(|(&pos, &distance)| (pos, distance))
    }

    /// Closest of `candidates`, ties broken by reading order.
    ///
    /// Unreachable candidates are ignored; `None` if all are unreachable.
    pub fn nearest<I>(&self, candidates: I) -> Option<(Coord, u32)>
    where
        I: IntoIterator<Item = Coord>,
    {
        candidates
            .into_iter()
            .filter_map(|pos| self.get(pos).map(|distance| (distance, pos)))
            .min()
            .map(|(distance, pos)| (pos, distance))
    }
}

/// A node in the search frontier.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct SearchNode {
    distance: u32,
    /// Tie-breaker: reading-order-smaller cells expand first.
    pos: Coord,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so compare reversed for min-heap behavior.
        match other.distance.cmp(&self.distance) {
            Ordering::Equal => other.pos.cmp(&self.pos),
            ord => ord,
        }
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Distances from `start` to every open cell reachable through open cells.
///
/// `start` itself is included at distance 0.
///
/// # Errors
///
/// Returns [`SimError::OutOfBounds`] if `start` is outside the board.
pub fn distances_from(board: &Board, start: Coord) -> Result<DistanceMap> {
    board.cell(start)?;

    let mut distances = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    distances.insert(start, 0);
    frontier.push(SearchNode {
        distance: 0,
        pos: start,
    });

    while let Some(current) = frontier.pop() {
        // Stale entry: a shorter label was settled after this was queued.
        if distances
            .get(&current.pos)
            .is_some_and(|&known| known < current.distance)
        {
            continue;
        }

        let next = current.distance + 1;
        for neighbor in board.open_neighbors(current.pos) {
            let improves = distances
                .get(&neighbor)
                .map_or(true, |&known| next < known);
            if improves {
                distances.insert(neighbor, next);
                frontier.push(SearchNode {
                    distance: next,
                    pos: neighbor,
                });
            }
        }
    }

    Ok(DistanceMap {
        source: start,
        distances,
    })
}

/// First step of the reading-order-smallest shortest path to `goal`.
///
/// Searches outward from `goal` and picks the open neighbor of `start` with
/// the smallest `(distance to goal, Coord)`. Any neighbor attaining the
/// minimum begins some shortest path, so this is exactly the smallest
/// possible first step.
///
/// # Errors
///
/// Returns [`SimError::UnreachableGoal`] if `goal == start`, `goal` is not
/// open, or no open path connects them, and [`SimError::OutOfBounds`] for
/// coordinates outside the board.
pub fn first_step_toward(board: &Board, start: Coord, goal: Coord) -> Result<Coord> {
    board.cell(start)?;
    let unreachable = SimError::UnreachableGoal { start, goal };

    if start == goal || !board.is_open(goal)? {
        return Err(unreachable);
    }

    let from_goal = distances_from(board, goal)?;
    from_goal
        .nearest(board.open_neighbors(start))
        .map(|(step, _)| step)
        .ok_or(unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitId;

    fn board(rows: &[&str]) -> Board {
        Board::parse(rows).unwrap().0
    }

    #[test]
    fn test_open_rectangle_is_manhattan() {
        let grid = Board::open(6, 4);
        let origin = Coord::new(0, 0);
        let distances = distances_from(&grid, origin).unwrap();

        assert_eq!(distances.len(), 24);
        for pos in grid.coords() {
            assert_eq!(distances.get(pos), Some(pos.row + pos.column), "at {pos}");
        }
    }

    #[test]
    fn test_walls_and_units_block() {
        let mut grid = board(&["#######", "#..#..#", "#..#..#", "#######"]);
        grid.place(UnitId(0), Coord::new(1, 2)).unwrap();

        let distances = distances_from(&grid, Coord::new(1, 1)).unwrap();

        assert_eq!(distances.get(Coord::new(2, 2)), Some(2));
        assert!(!distances.contains(Coord::new(1, 2)));
        assert!(!distances.contains(Coord::new(1, 4)));
        assert!(!distances.contains(Coord::new(0, 0)));
    }

    #[test]
    fn test_source_may_be_occupied() {
        let mut grid = Board::open(3, 1);
        grid.place(UnitId(0), Coord::new(0, 0)).unwrap();

        let distances = distances_from(&grid, Coord::new(0, 0)).unwrap();
        assert_eq!(distances.get(Coord::new(0, 0)), Some(0));
        assert_eq!(distances.get(Coord::new(0, 2)), Some(2));
    }

    #[test]
    fn test_distances_from_outside_fails() {
        let grid = Board::open(2, 2);
        assert!(matches!(
            distances_from(&grid, Coord::new(5, 5)),
            Err(SimError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_nearest_prefers_reading_order_on_ties() {
        let grid = Board::open(5, 5);
        let distances = distances_from(&grid, Coord::new(2, 2)).unwrap();

        // All four are two steps away.
        let candidates = [
            Coord::new(4, 2),
            Coord::new(2, 4),
            Coord::new(2, 0),
            Coord::new(0, 2),
        ];
        assert_eq!(
            distances.nearest(candidates),
            Some((Coord::new(0, 2), 2))
        );
    }

    #[test]
    fn test_nearest_ignores_unreachable() {
        let grid = board(&["#####", "#.#.#", "#####"]);
        let distances = distances_from(&grid, Coord::new(1, 1)).unwrap();

        assert_eq!(distances.nearest([Coord::new(1, 3)]), None);
    }

    #[test]
    fn test_first_step_picks_smallest_of_symmetric_paths() {
        let mut grid = board(&["#####", "#...#", "#...#", "#...#", "#####"]);
        grid.place(UnitId(0), Coord::new(1, 2)).unwrap();

        // Sideways steps are 3 from the goal, stepping down is 1.
        assert_eq!(
            first_step_toward(&grid, Coord::new(1, 2), Coord::new(3, 2)).unwrap(),
            Coord::new(2, 2)
        );

        // Diagonal goal: going left or down both work, left is first in reading order.
        grid.vacate(Coord::new(1, 2)).unwrap();
        grid.place(UnitId(0), Coord::new(2, 2)).unwrap();
        assert_eq!(
            first_step_toward(&grid, Coord::new(2, 2), Coord::new(3, 1)).unwrap(),
            Coord::new(2, 1)
        );
        // Up-right goal: up beats right.
        assert_eq!(
            first_step_toward(&grid, Coord::new(2, 2), Coord::new(1, 3)).unwrap(),
            Coord::new(1, 2)
        );
    }

    #[test]
    fn test_first_step_follows_detour() {
        let grid = board(&["#######", "#.....#", "#.###.#", "#.....#", "#######"]);

        // From the bottom-left corner to the bottom-right, the straight line is shortest.
        assert_eq!(
            first_step_toward(&grid, Coord::new(3, 1), Coord::new(3, 5)).unwrap(),
            Coord::new(3, 2)
        );
        // From the middle of the bottom row to the top-middle, both ways are 6 steps; left wins.
        assert_eq!(
            first_step_toward(&grid, Coord::new(3, 3), Coord::new(1, 3)).unwrap(),
            Coord::new(3, 2)
        );
    }

    #[test]
    fn test_first_step_rejects_bad_goals() {
        let grid = board(&["#####", "#.#.#", "#####"]);
        let start = Coord::new(1, 1);

        assert_eq!(
            first_step_toward(&grid, start, start),
            Err(SimError::UnreachableGoal { start, goal: start })
        );
        assert!(matches!(
            first_step_toward(&grid, start, Coord::new(1, 3)),
            Err(SimError::UnreachableGoal { .. })
        ));
        assert!(matches!(
            first_step_toward(&grid, start, Coord::new(1, 2)),
            Err(SimError::UnreachableGoal { .. })
        ));
    }

    #[test]
    fn test_search_is_deterministic() {
        let grid = board(&[
            "#########",
            "#...#...#",
            "#.#...#.#",
            "#...#...#",
            "#########",
        ]);
        let first = distances_from(&grid, Coord::new(1, 1)).unwrap();
        let second = distances_from(&grid, Coord::new(1, 1)).unwrap();
        assert_eq!(first, second);
    }
}
