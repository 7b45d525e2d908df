//! Match event types.
//!
//! Events describe what a committed move did. They are notifications only:
//! by the time one is published the match state already reflects it, and
//! nothing a listener does can change or undo that.
//!
//! ## Event Kinds
//!
//! | Kind       | Tagged color | Fired when                               |
//! |------------|--------------|------------------------------------------|
//! | `Start`    | mover        | a pawn leaves its nest                   |
//! | `Move`     | mover        | a plain move with nothing else to report |
//! | `Capture`  | mover        | the landing sent opponents home          |
//! | `Captured` | victim       | one per captured pawn                    |
//! | `Home`     | mover        | the pawn finished                        |

use serde::{Deserialize, Serialize};

use crate::core::{Color, PawnId};

/// What kind of thing happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Move,
    Capture,
    Captured,
    Home,
    Start,
}

impl EventKind {
    /// Every kind, in a stable order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Move,
        EventKind::Capture,
        EventKind::Captured,
        EventKind::Home,
        EventKind::Start,
    ];

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::Capture => "capture",
            EventKind::Captured => "captured",
            EventKind::Home => "home",
            EventKind::Start => "start",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A match event with the color it concerns.
///
/// ```
/// use ludo_echoes::core::{Color, PawnId};
/// use ludo_echoes::events::{EventKind, GameEvent};
///
/// let event = GameEvent::new(EventKind::Captured, Color::Gold)
///     .with_pawn(PawnId::new(Color::Gold, 2))
///     .with_context("by CRIMSON-0");
///
/// assert_eq!(event.color, Color::Gold);
/// assert_eq!(event.context.as_deref(), Some("by CRIMSON-0"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The kind of event.
    pub kind: EventKind,

    /// The acting (or, for `Captured`, affected) color.
    pub color: Color,

    /// The pawn the event is about.
    pub pawn: Option<PawnId>,

    /// Free-text detail for narrators.
    pub context: Option<String>,
}

impl GameEvent {
    /// Create an event with no pawn or context.
    #[must_use]
    pub fn new(kind: EventKind, color: Color) -> Self {
        Self {
            kind,
            color,
            pawn: None,
            context: None,
        }
    }

    /// Set the pawn (builder pattern).
    #[must_use]
    pub fn with_pawn(mut self, pawn: PawnId) -> Self {
        self.pawn = Some(pawn);
        self
    }

    /// Set the context text (builder pattern).
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        if let Some(pawn) = self.pawn {
            write!(f, " ({pawn})")?;
        }
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = GameEvent::new(EventKind::Home, Color::Emerald).with_pawn(PawnId::new(Color::Emerald, 3));

        assert_eq!(event.kind, EventKind::Home);
        assert_eq!(event.pawn, Some(PawnId::new(Color::Emerald, 3)));
        assert_eq!(event.context, None);
    }

    #[test]
    fn test_event_display() {
        let plain = GameEvent::new(EventKind::Move, Color::Crimson);
        assert_eq!(plain.to_string(), "CRIMSON move");

        let full = GameEvent::new(EventKind::Capture, Color::Sapphire)
            .with_pawn(PawnId::new(Color::Sapphire, 1))
            .with_context("took GOLD-0");
        assert_eq!(full.to_string(), "SAPPHIRE capture (SAPPHIRE-1): took GOLD-0");
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::new(EventKind::Start, Color::Gold).with_pawn(PawnId::new(Color::Gold, 0));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"start\""));

        let deserialized: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
