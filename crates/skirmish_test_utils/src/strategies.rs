//! Proptest strategies for simulation testing.
//!
//! These strategies generate random but reproducible boards for
//! property-based tests of path search and combat termination.

use proptest::prelude::*;
use skirmish_core::board::Board;
use skirmish_core::coord::Coord;

use crate::fixtures::walled_room;

/// Generate an all-open board and a cell inside it.
pub fn arb_open_board_with_cell() -> impl Strategy<Value = (Board, Coord)> {
    (1u32..12, 1u32..12).prop_flat_map(|(width, height)| {
        (0..height, 0..width)
            .prop_map(move |(row, column)| (Board::open(width, height), Coord::new(row, column)))
    })
}

/// Generate a unit glyph.
pub fn arb_unit_glyph() -> impl Strategy<Value = char> {
    prop_oneof![Just('E'), Just('G')]
}

/// Generate a walled, fully open room holding both factions.
///
/// An Elf always starts in the top-left corner and a Goblin in the
/// bottom-right corner; up to `max_extra` more units are scattered between.
pub fn arb_room_battle(max_extra: usize) -> impl Strategy<Value = Vec<String>> {
    (2usize..8, 1usize..6).prop_flat_map(move |(width, height)| {
        proptest::collection::vec(
            (1..=height, 1..=width, arb_unit_glyph()),
            0..=max_extra,
        )
        .prop_map(move |mut units| {
            units.push((1, 1, 'E'));
            units.push((height, width, 'G'));
            walled_room(width, height, &units)
        })
    })
}
