//! # ludo-echoes
//!
//! Rules engine and turn state machine for a four-player Ludo variant.
//!
//! Pawns leave their nest on a 6, run the 52-cell shared track clockwise,
//! turn into a private 5-cell home stretch and finish by landing exactly on
//! its last cell. Landing on an unsafe shared cell sends every opposing pawn
//! there back to its nest. A 6 grants another roll.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Free**: The crate produces plain state and events. It
//!    never assumes a renderer, input device or audio layer exists.
//!
//! 2. **Single Writer**: One `MatchState` owns every mutable field of a
//!    match. Only rolling, moving and resetting change it, and a request
//!    whose preconditions fail is a silent no-op.
//!
//! 3. **Notify, Don't Call Back**: Collaborators learn about moves from an
//!    event stream and cannot feed back into the match.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: pawns and log live in `im` vectors, so
//!   snapshots handed to renderers are O(1).
//!
//! - **Deterministic Dice**: a seeded `GameRng` replays a match exactly.
//!
//! ## Modules
//!
//! - `core`: colors, pawns, positions, RNG, configuration, match state
//! - `board`: track layout and position → board coordinate mapping
//! - `rules`: move legality, advancement, capture resolution
//! - `events`: match events and the broadcast bus
//! - `session`: async match handle with roll suspension
//! - `narration`: in-character team narration driven by events

pub mod board;
pub mod core;
pub mod events;
pub mod narration;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap, ConfigError, GameRng, MatchConfig, MatchSnapshot, MatchState, MoveReport,
    NarrationBackend, NarrationConfig, Pawn, PawnId, Phase, Position, RollOutcome, RollTicket, ThemeMap,
};

pub use crate::board::{coordinate_for, coordinate_for_logical, Coord};

pub use crate::rules::{can_move, next_position, MovePlan};

pub use crate::events::{EventBus, EventKind, GameEvent};

pub use crate::session::MatchHandle;

pub use crate::narration::{
    build_narrator, NarrationError, NarrationRequest, NarrationService, Narrator, RemoteNarrator,
    TemplateNarrator, TranscriptEntry,
};
