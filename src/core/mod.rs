//! Core match types: colors, pawns, positions, RNG, configuration, state.
//!
//! `MatchState` is the only owner of mutable match data. Everything else in
//! the crate either reads snapshots of it or calls its three mutating
//! operations.

pub mod color;
pub mod config;
pub mod pawn;
pub mod rng;
pub mod state;

pub use color::{Color, ColorMap, COLOR_COUNT};
pub use config::{ConfigError, MatchConfig, NarrationBackend, NarrationConfig, ThemeMap};
pub use pawn::{
    ParsePawnIdError, Pawn, PawnId, Position, FINISHED, NEST, PAWNS_PER_COLOR, PAWN_COUNT, STRETCH_BASE,
    STRETCH_END,
};
pub use rng::{GameRng, DIE_FACES};
pub use state::{
    is_die_value, MatchSnapshot, MatchState, MoveReport, Phase, RollOutcome, RollTicket, RESET_MESSAGE, WELCOME_MESSAGE,
};
