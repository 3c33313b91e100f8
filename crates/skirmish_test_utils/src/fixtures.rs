//! Test fixtures and helpers.
//!
//! Canonical maps with their known results, for consistent testing.

use skirmish_core::simulation::Simulation;

/// A map together with the results it must produce.
#[derive(Debug, Clone, Copy)]
pub struct Battle {
    /// Short name used in assertion messages.
    pub name: &'static str,
    /// Map rows.
    pub rows: &'static [&'static str],
    /// Full rounds with default rules.
    pub rounds: u32,
    /// Remaining hit points with default rules.
    pub hit_points: i64,
    /// Outcome score with default rules.
    pub score: i64,
    /// Smallest flawless Elf attack power and its score, where known.
    pub flawless: Option<(i32, i64)>,
}

impl Battle {
    /// Build a fresh default-rules simulation for this map.
    ///
    /// # Panics
    ///
    /// Panics if the fixture map is malformed.
    #[must_use]
    pub fn simulation(&self) -> Simulation {
        Simulation::from_rows(self.rows)
            .unwrap_or_else(|e| panic!("fixture {} is malformed: {e}", self.name))
    }
}

/// The worked example: movement, target choice and a late goblin win.
pub const OPENING: Battle = Battle {
    name: "opening",
    rows: &[
        "#######", //
        "#.G...#",
        "#...EG#",
        "#.#.#G#",
        "#..G#E#",
        "#.....#",
        "#######",
    ],
    rounds: 47,
    hit_points: 590,
    score: 27_730,
    flawless: Some((15, 4_988)),
};

/// Elves win while boxed in.
pub const ELVES_HOLD: Battle = Battle {
    name: "elves_hold",
    rows: &[
        "#######", //
        "#G..#E#",
        "#E#E.E#",
        "#G.##.#",
        "#...#E#",
        "#...E.#",
        "#######",
    ],
    rounds: 37,
    hit_points: 982,
    score: 36_334,
    flawless: None,
};

/// Elves win across split corridors.
pub const SPLIT_CORRIDORS: Battle = Battle {
    name: "split_corridors",
    rows: &[
        "#######", //
        "#E..EG#",
        "#.#G.E#",
        "#E.##E#",
        "#G..#.#",
        "#..E#.#",
        "#######",
    ],
    rounds: 46,
    hit_points: 859,
    score: 39_514,
    flawless: Some((4, 31_284)),
};

/// Goblins win from the left flank.
pub const LEFT_FLANK: Battle = Battle {
    name: "left_flank",
    rows: &[
        "#######", //
        "#E.G#.#",
        "#.#G..#",
        "#G.#.G#",
        "#G..#.#",
        "#...E.#",
        "#######",
    ],
    rounds: 35,
    hit_points: 793,
    score: 27_755,
    flawless: Some((15, 3_478)),
};

/// Goblins win through a winding pass.
pub const WINDING_PASS: Battle = Battle {
    name: "winding_pass",
    rows: &[
        "#######", //
        "#.E...#",
        "#.#..G#",
        "#.###.#",
        "#E#G#G#",
        "#...#G#",
        "#######",
    ],
    rounds: 54,
    hit_points: 536,
    score: 28_944,
    flawless: Some((12, 6_474)),
};

/// A larger open room.
pub const OPEN_HALL: Battle = Battle {
    name: "open_hall",
    rows: &[
        "#########",
        "#G......#",
        "#.E.#...#",
        "#..##..G#",
        "#...##..#",
        "#...#...#",
        "#.G...G.#",
        "#.....G.#",
        "#########",
    ],
    rounds: 20,
    hit_points: 937,
    score: 18_740,
    flawless: Some((34, 1_140)),
};

/// Every canonical battle.
pub const ALL_BATTLES: [Battle; 6] = [
    OPENING,
    ELVES_HOLD,
    SPLIT_CORRIDORS,
    LEFT_FLANK,
    WINDING_PASS,
    OPEN_HALL,
];

/// Two units facing each other down a single-row corridor in a 5x5 grid.
pub const CORRIDOR_DUEL: &[&str] = &["#####", "#E.G#", "#####", "#####", "#####"];

/// An open rectangle of `width` by `height` cells, walled in, with the
/// given glyphs placed at `(row, column)` inside the walls (1-based rows and
/// columns including the wall).
#[must_use]
pub fn walled_room(width: usize, height: usize, units: &[(usize, usize, char)]) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = (0..height + 2)
        .map(|row| {
            (0..width + 2)
                .map(|column| {
                    if row == 0 || column == 0 || row == height + 1 || column == width + 1 {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();

    for &(row, column, glyph) in units {
        if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = glyph;
        }
    }

    rows.into_iter().map(|r| r.into_iter().collect()).collect()
}
