//! Fixed track geometry: path length, stretch length, per-color offsets and
//! safe cells.
//!
//! ## Frames
//!
//! Shared-path indices are in a single global frame: index 0 is CRIMSON's
//! entry cell and indices increase clockwise. Every color enters the track at
//! its own offset, spaced `PATH_LENGTH / COLOR_COUNT` apart, and leaves it for
//! its private stretch after visiting all 52 cells.

use crate::core::{Color, COLOR_COUNT};

/// Cells on the shared circular track.
pub const PATH_LENGTH: u8 = 52;

/// Cells in each color's private home stretch.
pub const STRETCH_LENGTH: u8 = 5;

/// Distance between consecutive colors' entry cells.
pub const START_SPACING: u8 = PATH_LENGTH / COLOR_COUNT as u8;

/// Shared-path cells where no capture can happen.
///
/// Each color's entry cell, plus the cell eight steps past it.
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Largest number of steps a pawn can have travelled on the shared path
/// before the next step takes it into its stretch.
pub const LAST_PATH_STEP: u8 = PATH_LENGTH - 1;

/// Entry cell on the shared path for a color.
///
/// ```
/// use ludo_echoes::board::start_offset;
/// use ludo_echoes::core::Color;
///
/// assert_eq!(start_offset(Color::Crimson), 0);
/// assert_eq!(start_offset(Color::Sapphire), 13);
/// assert_eq!(start_offset(Color::Gold), 26);
/// assert_eq!(start_offset(Color::Emerald), 39);
/// ```
#[must_use]
pub const fn start_offset(color: Color) -> u8 {
    color.index() as u8 * START_SPACING
}

/// Last shared-path cell a color visits before turning into its stretch.
#[must_use]
pub const fn stretch_entry(color: Color) -> u8 {
    (start_offset(color) + LAST_PATH_STEP) % PATH_LENGTH
}

/// Steps already travelled on the shared path by a pawn of `color` at `cell`.
#[must_use]
pub const fn steps_from_start(color: Color, cell: u8) -> u8 {
    (cell + PATH_LENGTH - start_offset(color)) % PATH_LENGTH
}

/// Whether a shared-path cell is protected from captures.
#[must_use]
pub fn is_safe(cell: u8) -> bool {
    SAFE_CELLS.contains(&cell)
}
