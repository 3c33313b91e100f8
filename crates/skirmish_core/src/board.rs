//! Static grid topology and cell occupancy.
//!
//! The board is a dense row-major buffer sized to the parsed map. Units are
//! not stored here; occupied cells hold a [`UnitId`] back-reference into the
//! simulation's unit list, so "two units on one cell" cannot be represented.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::units::{Unit, UnitId};

/// Glyph for impassable terrain.
pub const WALL_GLYPH: char = '#';

/// Glyph for open floor.
pub const OPEN_GLYPH: char = '.';

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable, never changes.
    Wall,
    /// Free floor.
    Open,
    /// Floor currently held by a living unit.
    Occupied(UnitId),
}

impl Cell {
    /// Returns true if a unit may step onto this cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A starting unit found while parsing a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    /// Side of the unit.
    pub faction: Faction,
    /// Starting cell.
    pub position: Coord,
}

/// The grid a skirmish is fought on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Grid width in cells.
    width: u32,
    /// Grid height in cells.
    height: u32,
    /// Cell data stored in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Create a board with every cell open.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        assert!(width > 0, "Board width must be positive");
        assert!(height > 0, "Board height must be positive");

        Self {
            width,
            height,
            cells: vec![Cell::Open; (width as usize) * (height as usize)],
        }
    }

    /// Build a board from rows of map glyphs.
    ///
    /// Unit glyphs become open cells here; the returned spawns (in reading
    /// order) are placed by the caller once it has created the units.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInput`] for an empty map, ragged rows or
    /// an unknown glyph. No partial board is produced.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<(Self, Vec<Spawn>)> {
        let Some(first) = rows.first() else {
            return Err(malformed(0, 0, "map is empty"));
        };

        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(malformed(0, 0, "map has no columns"));
        }

        let width_u32 = u32::try_from(width).map_err(|_| malformed(0, width, "map too wide"))?;
        let height_u32 =
            u32::try_from(rows.len()).map_err(|_| malformed(rows.len(), 0, "map too tall"))?;

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut spawns = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let columns = line.chars().count();
            if columns != width {
                return Err(malformed(
                    row,
                    columns.min(width),
                    &format!("expected {width} columns, found {columns}"),
                ));
            }

            for (column, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    WALL_GLYPH => Cell::Wall,
                    OPEN_GLYPH => Cell::Open,
                    other => {
                        let faction = Faction::from_glyph(other).ok_or_else(|| {
                            malformed(row, column, &format!("unknown glyph '{other}'"))
                        })?;
                        // Both indices fit: width and height were checked above.
                        spawns.push(Spawn {
                            faction,
                            position: Coord::new(row as u32, column as u32),
                        });
                        Cell::Open
                    }
                };
                cells.push(cell);
            }
        }

        Ok((
            Self {
                width: width_u32,
                height: height_u32,
                cells,
            },
            spawns,
        ))
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Check if a coordinate lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, pos: Coord) -> bool {
        pos.row < self.height && pos.column < self.width
    }

    #[inline]
    fn index(&self, pos: Coord) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok((pos.row as usize) * (self.width as usize) + (pos.column as usize))
        } else {
            Err(SimError::OutOfBounds(pos))
        }
    }

    /// Cell state at `pos`.
    pub fn cell(&self, pos: Coord) -> Result<Cell> {
        self.index(pos).map(|index| self.cells[index])
    }

    /// Returns true if `pos` is free floor.
    pub fn is_open(&self, pos: Coord) -> Result<bool> {
        self.cell(pos).map(Cell::is_open)
    }

    /// Unit standing on `pos`, if any.
    pub fn occupant_at(&self, pos: Coord) -> Result<Option<UnitId>> {
        self.cell(pos).map(|cell| match cell {
            Cell::Occupied(id) => Some(id),
            Cell::Wall | Cell::Open => None,
        })
    }

    /// Orthogonal neighbors inside the grid, in reading order.
    #[must_use]
    pub fn neighbors(&self, pos: Coord) -> Vec<Coord> {
        pos.adjacent().filter(|&n| self.in_bounds(n)).collect()
    }

    /// Neighbors of `pos` that are free floor, in reading order.
    #[must_use]
    pub fn open_neighbors(&self, pos: Coord) -> Vec<Coord> {
        pos.adjacent()
            .filter(|&n| self.is_open(n).unwrap_or(false))
            .collect()
    }

    /// Mark `pos` as held by `unit`.
    ///
    /// The caller keeps the unit's `position` in sync.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the cell is a wall or already
    /// occupied.
    pub fn place(&mut self, unit: UnitId, pos: Coord) -> Result<()> {
        let index = self.index(pos)?;
        match self.cells[index] {
            Cell::Open => {
                self.cells[index] = Cell::Occupied(unit);
                Ok(())
            }
            Cell::Wall => Err(SimError::InvalidState(format!(
                "cannot place {unit} on wall at {pos}"
            ))),
            Cell::Occupied(other) => Err(SimError::InvalidState(format!(
                "cannot place {unit} at {pos}, already held by {other}"
            ))),
        }
    }

    /// Free `pos`, returning whoever stood there.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the cell is a wall.
    pub fn vacate(&mut self, pos: Coord) -> Result<Option<UnitId>> {
        let index = self.index(pos)?;
        match self.cells[index] {
            Cell::Wall => Err(SimError::InvalidState(format!("cannot vacate wall at {pos}"))),
            Cell::Open => Ok(None),
            Cell::Occupied(id) => {
                self.cells[index] = Cell::Open;
                Ok(Some(id))
            }
        }
    }

    /// Iterate all coordinates in reading order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |column| Coord::new(row, column)))
    }

    /// Render one row of the board as glyphs.
    ///
    /// Occupied cells use the occupant's faction glyph, looked up in `units`.
    #[must_use]
    pub fn render_row(&self, row: u32, units: &[Unit]) -> String {
        (0..self.width)
            .map(|column| {
                let index = (row as usize) * (self.width as usize) + (column as usize);
                match self.cells.get(index) {
                    Some(Cell::Wall) | None => WALL_GLYPH,
                    Some(Cell::Open) => OPEN_GLYPH,
                    Some(Cell::Occupied(id)) => units
                        .get(id.index())
                        .map_or('?', |unit| unit.faction.glyph()),
                }
            })
            .collect()
    }

    /// Render the whole board, rows joined by newlines.
    #[must_use]
    pub fn render(&self, units: &[Unit]) -> String {
        (0..self.height)
            .map(|row| self.render_row(row, units))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn malformed(row: usize, column: usize, message: &str) -> SimError {
    SimError::MalformedInput {
        row,
        column,
        message: message.to_string(),
    }
}
