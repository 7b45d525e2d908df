//! Match events and the channel they are published on.
//!
//! The match publishes events after every committed move. Narrators, logs
//! and audio layers subscribe; none of them can feed back into the match.

pub mod bus;
pub mod event;

pub use bus::EventBus;
pub use event::{EventKind, GameEvent};
