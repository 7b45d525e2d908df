//! Movement rules: legality, advancement and capture resolution.
//!
//! Everything here is pure. The match state calls into these functions and
//! commits the result; nothing in this module mutates pawns.
//!
//! ## Summary
//!
//! - Nest: only a 6 releases a pawn, onto its color's entry cell.
//! - Shared path: a pawn walks 51 steps from its entry cell, then turns into
//!   its private stretch. Steps past that spill into the stretch.
//! - Stretch: no overshoot from inside the stretch. Reaching the last
//!   stretch cell finishes the pawn, and so does spilling off the shared
//!   path onto or past it.
//! - Landing on an unsafe shared-path cell sends every opposing pawn there
//!   back to its nest.

use smallvec::SmallVec;

use crate::board::{is_safe, start_offset, steps_from_start, LAST_PATH_STEP, PATH_LENGTH, STRETCH_LENGTH};
use crate::core::{Pawn, PawnId, Position, DIE_FACES, STRETCH_BASE, STRETCH_END};

/// Index of the stretch cell that counts as home.
const LAST_STRETCH_INDEX: u8 = STRETCH_LENGTH - 1;

/// Furthest logical target a shared-path overflow may name: one past the
/// last stretch cell, which also means home. With a 5-cell stretch and a
/// 6-sided die every overflow fits.
const OVERFLOW_LIMIT: i32 = STRETCH_END + 1;

/// Whether `pawn` may move with `roll`.
///
/// ```
/// use ludo_echoes::core::{Color, Pawn, PawnId, Position};
/// use ludo_echoes::rules::can_move;
///
/// let pawn = Pawn::in_nest(PawnId::new(Color::Gold, 0));
/// assert!(!can_move(&pawn, 5));
/// assert!(can_move(&pawn, 6));
/// ```
#[must_use]
pub fn can_move(pawn: &Pawn, roll: u8) -> bool {
    debug_assert!((1..=DIE_FACES).contains(&roll), "roll out of range: {roll}");

    match pawn.position {
        Position::Nest => roll == DIE_FACES,
        Position::Finished => false,
        Position::Stretch(index) => stretch_logical(index) + i32::from(roll) <= STRETCH_END,
        Position::Path(cell) => {
            let steps = steps_from_start(pawn.color(), cell);
            match overflow(steps, roll) {
                Some(spill) => stretch_logical(spill - 1) <= OVERFLOW_LIMIT,
                None => true,
            }
        }
    }
}

/// Where `pawn` ends up after moving `roll` cells.
///
/// Only meaningful when `can_move(pawn, roll)` holds.
#[must_use]
pub fn next_position(pawn: &Pawn, roll: u8) -> Position {
    debug_assert!(can_move(pawn, roll), "{} cannot move {roll}", pawn.id);

    match pawn.position {
        Position::Nest => Position::Path(start_offset(pawn.color())),
        Position::Stretch(index) => land_in_stretch(index + roll),
        Position::Path(cell) => {
            let steps = steps_from_start(pawn.color(), cell);
            match overflow(steps, roll) {
                Some(spill) => land_in_stretch(spill - 1),
                None => Position::Path((cell + roll) % PATH_LENGTH),
            }
        }
        Position::Finished => Position::Finished,
    }
}

/// Cells past the last shared-path step, if the move leaves the shared path.
fn overflow(steps: u8, roll: u8) -> Option<u8> {
    let target = steps + roll;
    (target > LAST_PATH_STEP).then(|| target - LAST_PATH_STEP)
}

fn stretch_logical(index: u8) -> i32 {
    STRETCH_BASE + i32::from(index)
}

/// The last stretch cell is not a resting place: reaching it finishes the pawn.
fn land_in_stretch(index: u8) -> Position {
    if index >= LAST_STRETCH_INDEX {
        Position::Finished
    } else {
        Position::Stretch(index)
    }
}

/// Shared-path cell where a landing at `destination` captures, if any.
#[must_use]
pub fn capture_cell(destination: Position) -> Option<u8> {
    destination.path_cell().filter(|&cell| !is_safe(cell))
}

/// Opposing pawns sent home by `mover` landing on `destination`.
///
/// All opposing pawns on the cell are captured, not just the first.
#[must_use]
pub fn captured_by<'a>(
    pawns: impl IntoIterator<Item = &'a Pawn>,
    mover: PawnId,
    destination: Position,
) -> SmallVec<[PawnId; 4]> {
    let Some(cell) = capture_cell(destination) else {
        return SmallVec::new();
    };

    pawns
        .into_iter()
        .filter(|p| p.color() != mover.color() && p.position == Position::Path(cell))
        .map(|p| p.id)
        .collect()
}

/// Everything a single legal move does, computed before it is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePlan {
    pub pawn: PawnId,
    pub roll: u8,
    pub from: Position,
    pub to: Position,
    pub captured: SmallVec<[PawnId; 4]>,
}

impl MovePlan {
    /// Plan a move of `pawn` by `roll` against the current board.
    ///
    /// Returns `None` when the move is illegal.
    #[must_use]
    pub fn new<'a>(pawns: impl IntoIterator<Item = &'a Pawn>, pawn: &Pawn, roll: u8) -> Option<Self> {
        if !can_move(pawn, roll) {
            return None;
        }

        let to = next_position(pawn, roll);
        Some(Self {
            pawn: pawn.id,
            roll,
            from: pawn.position,
            to,
            captured: captured_by(pawns, pawn.id, to),
        })
    }

    /// The pawn left its nest.
    #[must_use]
    pub fn exits_nest(&self) -> bool {
        self.from.is_nest()
    }

    /// The pawn reached home.
    #[must_use]
    pub fn reaches_home(&self) -> bool {
        self.to.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::stretch_entry;
    use crate::core::Color;

    fn pawn_at(color: Color, position: Position) -> Pawn {
        Pawn {
            id: PawnId::new(color, 0),
            position,
        }
    }

    #[test]
    fn test_nest_needs_six() {
        let pawn = pawn_at(Color::Crimson, Position::Nest);
        for roll in 1..=5 {
            assert!(!can_move(&pawn, roll));
        }
        assert!(can_move(&pawn, 6));
    }

    #[test]
    fn test_finished_never_moves() {
        let pawn = pawn_at(Color::Gold, Position::Finished);
        for roll in 1..=6 {
            assert!(!can_move(&pawn, roll));
        }
    }

    #[test]
    fn test_exit_lands_on_start_offset() {
        for (color, expected) in Color::all().zip([0, 13, 26, 39]) {
            let pawn = pawn_at(color, Position::Nest);
            assert_eq!(next_position(&pawn, 6), Position::Path(expected));
        }
    }

    #[test]
    fn test_plain_move_wraps_path() {
        let pawn = pawn_at(Color::Sapphire, Position::Path(50));
        assert_eq!(next_position(&pawn, 4), Position::Path(2));
    }

    #[test]
    fn test_entering_stretch_from_five_before_entry() {
        for color in Color::all() {
            let cell = (stretch_entry(color) + PATH_LENGTH - 5) % PATH_LENGTH;
            let pawn = pawn_at(color, Position::Path(cell));
            assert!(can_move(&pawn, 6));
            assert_eq!(next_position(&pawn, 6), Position::Stretch(0), "{color}");
        }
    }

    #[test]
    fn test_overflow_indices() {
        // CRIMSON's last shared cell is 51.
        let pawn = pawn_at(Color::Crimson, Position::Path(51));
        assert_eq!(next_position(&pawn, 1), Position::Stretch(0));
        assert_eq!(next_position(&pawn, 4), Position::Stretch(3));
        assert_eq!(next_position(&pawn, 5), Position::Finished);
        assert!(can_move(&pawn, 6));
        assert_eq!(next_position(&pawn, 6), Position::Finished);
    }

    #[test]
    fn test_every_overflow_is_legal() {
        for color in Color::all() {
            let entry = stretch_entry(color);
            for back in 0..6 {
                let cell = (entry + PATH_LENGTH - back) % PATH_LENGTH;
                let pawn = pawn_at(color, Position::Path(cell));
                for roll in 1..=6 {
                    assert!(can_move(&pawn, roll), "{color} cell {cell} roll {roll}");
                }
            }
        }
    }

    #[test]
    fn test_stretch_exact_landing() {
        let pawn = pawn_at(Color::Emerald, Position::Stretch(1));
        assert_eq!(next_position(&pawn, 2), Position::Stretch(3));
        assert_eq!(next_position(&pawn, 3), Position::Finished);
        assert!(!can_move(&pawn, 4));
    }

    #[test]
    fn test_last_stretch_cell_cannot_move() {
        let pawn = pawn_at(Color::Sapphire, Position::Stretch(LAST_STRETCH_INDEX));
        for roll in 1..=6 {
            assert!(!can_move(&pawn, roll));
        }
    }

    #[test]
    fn test_capture_cell_skips_safe_and_off_path() {
        assert_eq!(capture_cell(Position::Path(5)), Some(5));
        assert_eq!(capture_cell(Position::Path(8)), None);
        assert_eq!(capture_cell(Position::Path(13)), None);
        assert_eq!(capture_cell(Position::Stretch(0)), None);
        assert_eq!(capture_cell(Position::Finished), None);
    }

    #[test]
    fn test_captured_by_takes_every_opponent_but_not_allies() {
        let pawns = [
            Pawn { id: PawnId::new(Color::Sapphire, 0), position: Position::Path(20) },
            Pawn { id: PawnId::new(Color::Gold, 2), position: Position::Path(20) },
            Pawn { id: PawnId::new(Color::Crimson, 1), position: Position::Path(20) },
            Pawn { id: PawnId::new(Color::Emerald, 0), position: Position::Path(19) },
        ];
        let mover = PawnId::new(Color::Crimson, 0);

        let captured = captured_by(&pawns, mover, Position::Path(20));
        assert_eq!(captured.as_slice(), &[PawnId::new(Color::Sapphire, 0), PawnId::new(Color::Gold, 2)]);

        assert!(captured_by(&pawns, mover, Position::Path(21)).is_empty());
    }

    #[test]
    fn test_move_plan() {
        let mover = pawn_at(Color::Crimson, Position::Nest);
        let victim = Pawn { id: PawnId::new(Color::Gold, 1), position: Position::Path(0) };
        let pawns = [mover, victim];

        let plan = MovePlan::new(&pawns, &mover, 6).expect("six releases the pawn");
        assert!(plan.exits_nest());
        assert!(!plan.reaches_home());
        assert_eq!(plan.to, Position::Path(0));
        assert!(plan.captured.is_empty(), "entry cells are safe");

        assert!(MovePlan::new(&pawns, &mover, 3).is_none());
    }
}
