//! Grid coordinates and reading order.
//!
//! Reading order (top-to-bottom, then left-to-right) breaks every tie in the
//! simulation: turn order, move destinations, first steps and attack targets.
//! It falls out of the derived `Ord` because `row` is declared before
//! `column`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(row, column)` position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, 0 at the top.
    pub row: u32,
    /// Column index, 0 at the left.
    pub column: u32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Orthogonal neighbors that do not underflow, in reading order.
    ///
    /// Upper bounds are the board's concern.
    #[must_use]
    pub fn adjacent(self) -> impl Iterator<Item = Coord> {
        let up = self.row.checked_sub(1).map(|row| Coord::new(row, self.column));
        let left = self
            .column
            .checked_sub(1)
            .map(|column| Coord::new(self.row, column));
        let right = self
            .column
            .checked_add(1)
            .map(|column| Coord::new(self.row, column));
        let down = self.row.checked_add(1).map(|row| Coord::new(row, self.column));

        [up, left, right, down].into_iter().flatten()
    }

    /// Manhattan distance between two coordinates.
    #[must_use]
    pub const fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
