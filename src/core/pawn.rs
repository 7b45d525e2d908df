//! Pawn identity and the position model.
//!
//! ## Position Encoding
//!
//! Positions are a closed enum. Renderers and logs that want the flat
//! integer encoding use `Position::logical()`:
//!
//! | Position        | Logical      |
//! |-----------------|--------------|
//! | `Nest`          | `-1`         |
//! | `Path(0..=51)`  | `0..=51`     |
//! | `Stretch(0..=4)`| `100..=104`  |
//! | `Finished`      | `200`        |
//!
//! Values outside these ranges cannot be constructed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::color::{Color, COLOR_COUNT};
use crate::board::{PATH_LENGTH, STRETCH_LENGTH};

/// Pawns owned by each color.
pub const PAWNS_PER_COLOR: usize = 4;

/// Total pawns in a match.
pub const PAWN_COUNT: usize = PAWNS_PER_COLOR * COLOR_COUNT;

/// Logical value for a pawn in its nest.
pub const NEST: i32 = -1;

/// Logical value of the first stretch cell.
pub const STRETCH_BASE: i32 = 100;

/// Logical value of the last stretch cell.
pub const STRETCH_END: i32 = STRETCH_BASE + STRETCH_LENGTH as i32 - 1;

/// Logical value for a finished pawn.
pub const FINISHED: i32 = 200;

/// Where a pawn currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Not yet released onto the track.
    Nest,
    /// Shared-path cell in the global frame.
    Path(u8),
    /// Cell within the owner's private stretch (0-based).
    Stretch(u8),
    /// Reached home.
    Finished,
}

impl Position {
    /// Flat integer encoding.
    ///
    /// ```
    /// use ludo_echoes::core::Position;
    ///
    /// assert_eq!(Position::Nest.logical(), -1);
    /// assert_eq!(Position::Path(13).logical(), 13);
    /// assert_eq!(Position::Stretch(2).logical(), 102);
    /// assert_eq!(Position::Finished.logical(), 200);
    /// ```
    #[must_use]
    pub const fn logical(self) -> i32 {
        match self {
            Position::Nest => NEST,
            Position::Path(cell) => cell as i32,
            Position::Stretch(index) => STRETCH_BASE + index as i32,
            Position::Finished => FINISHED,
        }
    }

    /// Decode the flat integer encoding. `None` for values outside it.
    #[must_use]
    pub const fn from_logical(value: i32) -> Option<Self> {
        match value {
            NEST => Some(Position::Nest),
            FINISHED => Some(Position::Finished),
            v if v >= 0 && v < PATH_LENGTH as i32 => Some(Position::Path(v as u8)),
            v if v >= STRETCH_BASE && v <= STRETCH_END => Some(Position::Stretch((v - STRETCH_BASE) as u8)),
            _ => None,
        }
    }

    /// True while the pawn sits in its nest.
    #[must_use]
    pub const fn is_nest(self) -> bool {
        matches!(self, Position::Nest)
    }

    /// True once the pawn has reached home.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Position::Finished)
    }

    /// Shared-path cell, if the pawn is on the shared path.
    #[must_use]
    pub const fn path_cell(self) -> Option<u8> {
        match self {
            Position::Path(cell) => Some(cell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Nest => f.write_str("nest"),
            Position::Path(cell) => write!(f, "cell {cell}"),
            Position::Stretch(index) => write!(f, "stretch {index}"),
            Position::Finished => f.write_str("home"),
        }
    }
}

/// Unique identifier for a pawn: its color and slot.
///
/// The textual form is `<COLOR>-<slot>`, e.g. `CRIMSON-0`. Every value names
/// one of the 16 pawns: the slot is checked on construction, parsing and
/// deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPawnId", into = "RawPawnId")]
pub struct PawnId {
    color: Color,
    slot: u8,
}

impl PawnId {
    /// Create a pawn ID. Panics if `slot` is not 0-3.
    #[must_use]
    pub const fn new(color: Color, slot: u8) -> Self {
        assert!((slot as usize) < PAWNS_PER_COLOR, "Pawn slot must be 0-3");
        Self { color, slot }
    }

    /// Create a pawn ID, or `None` if `slot` is not 0-3.
    #[must_use]
    pub const fn try_new(color: Color, slot: u8) -> Option<Self> {
        if (slot as usize) < PAWNS_PER_COLOR {
            Some(Self { color, slot })
        } else {
            None
        }
    }

    /// Owning color.
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Slot within the color (0-3).
    #[must_use]
    pub const fn slot(self) -> u8 {
        self.slot
    }

    /// Dense index (0..16), grouping pawns by color in rotation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.color.index() * PAWNS_PER_COLOR + self.slot as usize
    }

    /// Iterate over the four pawn IDs of a color.
    pub fn of_color(color: Color) -> impl Iterator<Item = PawnId> {
        (0..PAWNS_PER_COLOR as u8).map(move |slot| PawnId::new(color, slot))
    }

    /// Iterate over all 16 pawn IDs, in dense index order.
    pub fn all() -> impl Iterator<Item = PawnId> {
        Color::all().flat_map(PawnId::of_color)
    }
}

impl std::fmt::Display for PawnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color, self.slot)
    }
}

/// Error parsing a pawn ID from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pawn id: {0:?}")]
pub struct ParsePawnIdError(pub String);

impl FromStr for PawnId {
    type Err = ParsePawnIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePawnIdError(s.to_string());
        let (color, slot) = s.rsplit_once('-').ok_or_else(err)?;
        let color = Color::from_name(color).ok_or_else(err)?;
        let slot: u8 = slot.parse().map_err(|_| err())?;
        PawnId::try_new(color, slot).ok_or_else(err)
    }
}

/// Wire form of `PawnId`, validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawPawnId {
    color: Color,
    slot: u8,
}

impl TryFrom<RawPawnId> for PawnId {
    type Error = ParsePawnIdError;

    fn try_from(raw: RawPawnId) -> Result<Self, Self::Error> {
        PawnId::try_new(raw.color, raw.slot).ok_or_else(|| ParsePawnIdError(format!("{}-{}", raw.color, raw.slot)))
    }
}

impl From<PawnId> for RawPawnId {
    fn from(id: PawnId) -> Self {
        Self {
            color: id.color,
            slot: id.slot,
        }
    }
}

/// A pawn and where it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub position: Position,
}

impl Pawn {
    /// A pawn waiting in its nest.
    #[must_use]
    pub const fn in_nest(id: PawnId) -> Self {
        Self {
            id,
            position: Position::Nest,
        }
    }

    /// Owning color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.id.color
    }

    /// Slot within the color (0-3). Only used to pick a nest coordinate.
    #[must_use]
    pub const fn slot(&self) -> u8 {
        self.id.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_round_trip_over_valid_ranges() {
        let valid = std::iter::once(-1)
            .chain(0..52)
            .chain(100..105)
            .chain(std::iter::once(200));

        for value in valid {
            let position = Position::from_logical(value).expect("valid logical position");
            assert_eq!(position.logical(), value);
        }
    }

    #[test]
    fn test_from_logical_rejects_gaps() {
        for value in [-2, 52, 99, 105, 199, 201] {
            assert_eq!(Position::from_logical(value), None, "{value} should be rejected");
        }
    }

    #[test]
    fn test_pawn_id_index_is_dense() {
        let indices: Vec<_> = PawnId::all().map(PawnId::index).collect();
        assert_eq!(indices, (0..PAWN_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_pawn_id_display_and_parse() {
        let id = PawnId::new(Color::Gold, 3);
        assert_eq!(id.to_string(), "GOLD-3");
        assert_eq!("GOLD-3".parse::<PawnId>(), Ok(id));
        assert_eq!("gold-3".parse::<PawnId>(), Ok(id));
    }

    #[test]
    fn test_pawn_id_parse_errors() {
        assert!("GOLD".parse::<PawnId>().is_err());
        assert!("GOLD-4".parse::<PawnId>().is_err());
        assert!("TEAL-0".parse::<PawnId>().is_err());
        assert!("GOLD-x".parse::<PawnId>().is_err());
    }

    #[test]
    fn test_pawn_id_deserialize_rejects_bad_slot() {
        let id: PawnId = serde_json::from_str(r#"{"color":"GOLD","slot":3}"#).unwrap();
        assert_eq!(id, PawnId::new(Color::Gold, 3));
        assert_eq!(serde_json::to_string(&id).unwrap(), r#"{"color":"GOLD","slot":3}"#);

        for slot in [4, 9, 12, 255] {
            let json = format!(r#"{{"color":"CRIMSON","slot":{slot}}}"#);
            assert!(serde_json::from_str::<PawnId>(&json).is_err(), "slot {slot}");
        }
    }

    #[test]
    fn test_pawn_id_try_new() {
        assert_eq!(PawnId::try_new(Color::Emerald, 2), Some(PawnId::new(Color::Emerald, 2)));
        assert_eq!(PawnId::try_new(Color::Emerald, 4), None);
    }

    #[test]
    #[should_panic(expected = "Pawn slot must be 0-3")]
    fn test_pawn_id_bad_slot() {
        let _ = PawnId::new(Color::Crimson, 4);
    }

    #[test]
    fn test_pawn_serialization() {
        let pawn = Pawn {
            id: PawnId::new(Color::Sapphire, 1),
            position: Position::Stretch(3),
        };
        let json = serde_json::to_string(&pawn).unwrap();
        let deserialized: Pawn = serde_json::from_str(&json).unwrap();
        assert_eq!(pawn, deserialized);
    }
}
