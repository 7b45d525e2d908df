//! Movement rules for the shared track and home stretches.
//!
//! Rules are pure functions over pawns:
//! - Which pawns may move for a roll
//! - Where a moving pawn lands
//! - Which opposing pawns a landing captures
//!
//! The match state calls into these rules but never re-derives them.

pub mod engine;

pub use engine::{can_move, capture_cell, captured_by, next_position, MovePlan};
