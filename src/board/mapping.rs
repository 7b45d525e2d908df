//! Position → board coordinate mapping.
//!
//! Translates a pawn's semantic position into a cell on the fixed 15×15
//! board. Pure and deterministic: renderers call it every frame.
//!
//! ```text
//!        col 0 ......... 6 7 8 ......... 14
//! row 0   [CRIMSON nest]  . . .  [SAPPHIRE nest]
//!  ...                    . S .
//! row 6   . . . . . .     . S .     . . . . . .
//! row 7   . S S S S S       *       S S S S S .
//! row 8   . . . . . .     . S .     . . . . . .
//!  ...                    . S .
//! row 14  [EMERALD nest]  . . .  [GOLD nest]
//! ```
//!
//! The shared path starts at CRIMSON's entry `(6, 1)` and runs clockwise.
//! Nest coordinates sit at the centers of 2×2 clusters, so they are
//! fractional.

use serde::{Deserialize, Serialize};

use super::layout::{PATH_LENGTH, STRETCH_LENGTH};
use crate::core::{Color, ColorMap, Position, PAWNS_PER_COLOR};

/// Board side length in cells.
pub const BOARD_SIZE: u8 = 15;

/// A board coordinate. Row 0 is the top edge, column 0 the left edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub row: f32,
    pub col: f32,
}

impl Coord {
    #[must_use]
    pub const fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }
}

/// Shared path, clockwise from CRIMSON's entry cell.
const PATH: [(u8, u8); PATH_LENGTH as usize] = [
    // CRIMSON arm
    (6, 1), (6, 2), (6, 3), (6, 4), (6, 5),
    (5, 6), (4, 6), (3, 6), (2, 6), (1, 6), (0, 6),
    (0, 7), (0, 8),
    // SAPPHIRE arm
    (1, 8), (2, 8), (3, 8), (4, 8), (5, 8),
    (6, 9), (6, 10), (6, 11), (6, 12), (6, 13), (6, 14),
    (7, 14), (8, 14),
    // GOLD arm
    (8, 13), (8, 12), (8, 11), (8, 10), (8, 9),
    (9, 8), (10, 8), (11, 8), (12, 8), (13, 8), (14, 8),
    (14, 7), (14, 6),
    // EMERALD arm
    (13, 6), (12, 6), (11, 6), (10, 6), (9, 6),
    (8, 5), (8, 4), (8, 3), (8, 2), (8, 1), (8, 0),
    (7, 0), (6, 0),
];

/// Home stretches, outer cell first, in rotation order.
const STRETCHES: [[(u8, u8); STRETCH_LENGTH as usize]; 4] = [
    [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5)],
    [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7)],
    [(7, 13), (7, 12), (7, 11), (7, 10), (7, 9)],
    [(13, 7), (12, 7), (11, 7), (10, 7), (9, 7)],
];

/// Nest clusters (row, col of the top-left pawn) in rotation order.
const NEST_ORIGINS: [(f32, f32); 4] = [(1.5, 1.5), (1.5, 10.5), (10.5, 10.5), (10.5, 1.5)];

/// Spacing between pawns within a nest cluster.
const NEST_SPACING: f32 = 2.0;

/// Where finished pawns gather.
pub const CENTER: Coord = Coord::new(7.0, 7.0);

/// Board coordinate for a pawn of `color` in `slot` at `position`.
///
/// ```
/// use ludo_echoes::board::{coordinate_for, Coord};
/// use ludo_echoes::core::{Color, Position};
///
/// assert_eq!(coordinate_for(Color::Crimson, Position::Path(0), 0), Coord::new(6.0, 1.0));
/// assert_eq!(coordinate_for(Color::Gold, Position::Finished, 2), Coord::new(7.0, 7.0));
/// ```
#[must_use]
pub fn coordinate_for(color: Color, position: Position, slot: u8) -> Coord {
    match position {
        Position::Nest => nest_coordinate(color, slot),
        Position::Stretch(index) => {
            assert!(index < STRETCH_LENGTH, "stretch index out of range: {index}");
            grid_cell(STRETCHES[color.index()][usize::from(index)])
        }
        Position::Finished => CENTER,
        Position::Path(cell) => grid_cell(PATH[usize::from(cell % PATH_LENGTH)]),
    }
}

/// Board coordinate from the flat integer encoding.
///
/// # Panics
///
/// If `logical` is outside `{-1} ∪ [0,51] ∪ [100,104] ∪ {200}`. Positions
/// are only ever produced by the rules, so this is a bug in the caller.
#[must_use]
pub fn coordinate_for_logical(color: Color, logical: i32, slot: u8) -> Coord {
    let position = Position::from_logical(logical)
        .unwrap_or_else(|| panic!("logical position out of range: {logical}"));
    coordinate_for(color, position, slot)
}

fn grid_cell((row, col): (u8, u8)) -> Coord {
    Coord::new(f32::from(row), f32::from(col))
}

fn nest_coordinate(color: Color, slot: u8) -> Coord {
    assert!(usize::from(slot) < PAWNS_PER_COLOR, "nest slot out of range: {slot}");
    let (row, col) = NEST_ORIGINS[color.index()];
    let row_offset = f32::from(slot / 2) * NEST_SPACING;
    let col_offset = f32::from(slot % 2) * NEST_SPACING;
    Coord::new(row + row_offset, col + col_offset)
}

/// All four nest coordinates for every color, slot order.
#[must_use]
pub fn nest_coordinates() -> ColorMap<[Coord; PAWNS_PER_COLOR]> {
    ColorMap::new(|color| std::array::from_fn(|slot| nest_coordinate(color, slot as u8)))
}
