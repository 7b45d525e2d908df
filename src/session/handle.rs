//! `MatchHandle`: the async, shared face of one match.
//!
//! The match state sits behind one tokio mutex. Rolls take the lock twice,
//! once to start and once to resolve, and sleep in between without it.

use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, instrument};

use crate::core::{
    is_die_value, MatchConfig, MatchSnapshot, MatchState, MoveReport, NarrationConfig, PawnId, RollOutcome, ThemeMap,
};
use crate::events::{EventBus, GameEvent};
use crate::narration::{build_narrator, NarrationService};

/// Shared handle to one match.
///
/// Cloning is cheap; every clone drives the same match.
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// use ludo_echoes::core::{Color, MatchConfig, RollOutcome};
/// use ludo_echoes::session::MatchHandle;
///
/// let handle = MatchHandle::new(&MatchConfig::default().with_seed(3).with_roll_delay_ms(0));
/// match handle.request_roll().await {
///     RollOutcome::AwaitingMove { player, .. } | RollOutcome::Passed { player, .. } => {
///         assert_eq!(player, Color::Crimson);
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MatchHandle {
    state: Arc<Mutex<MatchState>>,
    bus: EventBus,
    roll_delay: Duration,
}

impl MatchHandle {
    /// Start a match from configuration.
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        Self::from_state(MatchState::new(config), config.roll_delay())
    }

    /// Wrap an existing match state.
    #[must_use]
    pub fn from_state(state: MatchState, roll_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            bus: EventBus::default(),
            roll_delay,
        }
    }

    /// Roll the die for the current player.
    ///
    /// The roll stays pending for the configured delay. Rolls requested
    /// meanwhile are ignored, as are moves, since no die value is visible
    /// yet. A reset during the delay turns this roll `Stale`.
    #[instrument(skip(self))]
    pub async fn request_roll(&self) -> RollOutcome {
        let Some(ticket) = self.state.lock().await.begin_roll() else {
            return RollOutcome::Ignored;
        };

        self.tumble().await;
        let outcome = self.state.lock().await.finish_roll(ticket);
        debug!(?outcome, "roll resolved");
        outcome
    }

    /// Roll a known value, with the same suspension as `request_roll`.
    ///
    /// A value outside 1..=6 is `Ignored` without starting a roll.
    #[instrument(skip(self))]
    pub async fn request_roll_with(&self, value: u8) -> RollOutcome {
        if !is_die_value(value) {
            debug!("die value out of range ignored");
            return RollOutcome::Ignored;
        }
        let Some(ticket) = self.state.lock().await.begin_roll() else {
            return RollOutcome::Ignored;
        };

        self.tumble().await;
        self.state.lock().await.finish_roll_with(ticket, value)
    }

    async fn tumble(&self) {
        if !self.roll_delay.is_zero() {
            tokio::time::sleep(self.roll_delay).await;
        }
    }

    /// Spend the pending roll on `pawn`.
    ///
    /// Events are published once the move is committed. An ignored request
    /// publishes nothing.
    #[instrument(skip(self, pawn), fields(pawn = %pawn))]
    pub async fn request_move(&self, pawn: PawnId) -> Option<MoveReport> {
        let mut state = self.state.lock().await;
        let report = state.request_move(pawn)?;
        // Publishing never blocks, so it can happen under the lock and keep
        // event order identical to commit order.
        self.bus.publish(report.events.iter().cloned());
        Some(report)
    }

    /// Restore the opening configuration.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    /// Replace the team themes.
    pub async fn set_themes(&self, themes: ThemeMap) {
        self.state.lock().await.set_themes(themes);
    }

    /// Read-only copy of the match.
    pub async fn snapshot(&self) -> MatchSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Pawns the current player may move with the pending roll.
    pub async fn legal_moves(&self) -> SmallVec<[PawnId; 4]> {
        self.state.lock().await.legal_moves()
    }

    /// Start narrating this match's events.
    ///
    /// Narration randomness comes from streams derived from the dice seed,
    /// so a seeded match narrates the same way every time.
    pub async fn spawn_narration(&self, config: &NarrationConfig) -> NarrationService {
        let (narrator_rng, chatter_rng) = {
            let state = self.state.lock().await;
            (state.rng_for("narration"), state.rng_for("chatter"))
        };
        let narrator = build_narrator(config, narrator_rng);
        NarrationService::spawn_with_rng(self.subscribe(), narrator, config, chatter_rng)
    }

    /// Receive events of moves committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.bus.subscribe()
    }

    /// The bus events are published on.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Configured roll suspension.
    #[must_use]
    pub fn roll_delay(&self) -> Duration {
        self.roll_delay
    }
}
