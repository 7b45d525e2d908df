//! Board geometry.
//!
//! - `layout`: track lengths, per-color offsets, safe cells
//! - `mapping`: semantic position → 15×15 board coordinate

pub mod layout;
pub mod mapping;

pub use layout::{
    is_safe, start_offset, steps_from_start, stretch_entry, LAST_PATH_STEP, PATH_LENGTH, SAFE_CELLS,
    START_SPACING, STRETCH_LENGTH,
};
pub use mapping::{coordinate_for, coordinate_for_logical, nest_coordinates, Coord, BOARD_SIZE, CENTER};
