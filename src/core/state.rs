//! Match state: the single authoritative model of one match.
//!
//! ## MatchState
//!
//! Owns the pawns, whose turn it is, the pending die value, the winner and
//! the match log. Only three operations mutate it:
//! - rolling (`begin_roll` + `finish_roll`, or `roll_now`)
//! - `request_move`
//! - `reset`
//!
//! Every precondition failure is a silent no-op: the state is left exactly
//! as it was and the caller gets an `Ignored`/`None` outcome it is free to
//! drop.
//!
//! ## MatchSnapshot
//!
//! Read-only copy handed to renderers. Pawns and log use `im` persistent
//! vectors, so taking a snapshot is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::color::{Color, ColorMap};
use super::config::{MatchConfig, ThemeMap};
use super::pawn::{Pawn, PawnId, Position, PAWN_COUNT};
use super::rng::{GameRng, DIE_FACES};
use crate::events::{EventKind, GameEvent};
use crate::rules::MovePlan;

/// First log line of a new match.
pub const WELCOME_MESSAGE: &str = "Welcome to Ludo Echoes! Team Crimson starts.";

/// Sole log line after a reset.
pub const RESET_MESSAGE: &str = "Game Reset.";

/// Where a match is in its turn cycle. Derived from the state fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the current player to roll.
    Idle,
    /// A roll is tumbling.
    RollPending,
    /// A die value is waiting to be spent on a move.
    AwaitingMove,
    /// Somebody won. Only `reset` leaves this phase.
    Won,
}

/// Proof that a roll was started, redeemed by `finish_roll`.
///
/// Tickets issued before a reset are stale and resolve to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a started roll must be finished"]
pub struct RollTicket {
    epoch: u64,
}

/// What a roll request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollOutcome {
    /// Preconditions failed. Nothing changed.
    Ignored,
    /// The match was reset while the die was tumbling. Nothing changed.
    Stale,
    /// The current player has at least one legal move with `value`.
    AwaitingMove { player: Color, value: u8 },
    /// No legal move: the roll was wasted and the turn passed to `next`.
    Passed { player: Color, value: u8, next: Color },
}

/// What a committed move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub plan: MovePlan,
    /// Notifications for listeners, mover's event first.
    pub events: Vec<GameEvent>,
    /// Set when this move won the match.
    pub winner: Option<Color>,
    /// Whose turn it is now.
    pub next_player: Color,
}

impl MoveReport {
    /// The mover keeps the turn.
    #[must_use]
    pub fn bonus_turn(&self) -> bool {
        self.next_player == self.plan.pawn.color() && self.winner.is_none()
    }
}

/// Read-only view of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub pawns: Vector<Pawn>,
    pub current_player: Color,
    pub dice_value: Option<u8>,
    pub roll_in_progress: bool,
    pub winner: Option<Color>,
    /// Newest entry first.
    pub log: Vector<String>,
    pub themes: ThemeMap,
    pub phase: Phase,
}

impl MatchSnapshot {
    /// Look up a pawn.
    #[must_use]
    pub fn pawn(&self, id: PawnId) -> &Pawn {
        &self.pawns[id.index()]
    }

    /// The four pawns of a color.
    pub fn pawns_of(&self, color: Color) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.color() == color)
    }
}

/// The match state machine.
#[derive(Clone, Debug)]
pub struct MatchState {
    /// Indexed by `PawnId::index()`.
    pawns: Vector<Pawn>,
    current_player: Color,
    dice_value: Option<u8>,
    roll_in_progress: bool,
    winner: Option<Color>,
    log: Vector<String>,
    themes: ThemeMap,
    rng: GameRng,
    /// Bumped on every reset to invalidate in-flight rolls.
    epoch: u64,
}

impl MatchState {
    /// Create a match from configuration.
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let mut state = Self::with_rng(rng);
        state.themes = config.themes.clone();
        state
    }

    /// Create a match with a fixed dice seed and no themes.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    fn with_rng(rng: GameRng) -> Self {
        Self {
            pawns: initial_pawns(),
            current_player: Color::FIRST,
            dice_value: None,
            roll_in_progress: false,
            winner: None,
            log: Vector::unit(WELCOME_MESSAGE.to_string()),
            themes: ThemeMap::with_default(),
            rng,
            epoch: 0,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[must_use]
    pub fn dice_value(&self) -> Option<u8> {
        self.dice_value
    }

    #[must_use]
    pub fn roll_in_progress(&self) -> bool {
        self.roll_in_progress
    }

    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Match log, newest entry first.
    #[must_use]
    pub fn log(&self) -> &Vector<String> {
        &self.log
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeMap {
        &self.themes
    }

    #[must_use]
    pub fn pawn(&self, id: PawnId) -> &Pawn {
        &self.pawns[id.index()]
    }

    /// All pawns, grouped by color in rotation order.
    pub fn pawns(&self) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter()
    }

    /// Current phase of the turn cycle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::Won
        } else if self.roll_in_progress {
            Phase::RollPending
        } else if self.dice_value.is_some() {
            Phase::AwaitingMove
        } else {
            Phase::Idle
        }
    }

    /// Pawns of the current player that can spend the pending roll.
    ///
    /// Empty when no roll is pending.
    #[must_use]
    pub fn legal_moves(&self) -> SmallVec<[PawnId; 4]> {
        match self.dice_value {
            Some(roll) if self.winner.is_none() => self.movable_pawns(self.current_player, roll),
            _ => SmallVec::new(),
        }
    }

    fn movable_pawns(&self, color: Color, roll: u8) -> SmallVec<[PawnId; 4]> {
        self.pawns
            .iter()
            .filter(|p| p.color() == color && crate::rules::can_move(p, roll))
            .map(|p| p.id)
            .collect()
    }

    /// Finished pawn count per color.
    #[must_use]
    pub fn finished_counts(&self) -> ColorMap<usize> {
        let mut counts = ColorMap::with_value(0);
        for pawn in self.pawns.iter().filter(|p| p.position.is_finished()) {
            counts[pawn.color()] += 1;
        }
        counts
    }

    /// RNG stream for `context`, derived from the dice seed.
    ///
    /// Independent of the dice: drawing from it never changes a roll, and
    /// the same seed and context always give the same stream.
    #[must_use]
    pub fn rng_for(&self, context: &str) -> GameRng {
        self.rng.for_context(context)
    }

    /// O(1) read-only copy.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            pawns: self.pawns.clone(),
            current_player: self.current_player,
            dice_value: self.dice_value,
            roll_in_progress: self.roll_in_progress,
            winner: self.winner,
            log: self.log.clone(),
            themes: self.themes.clone(),
            phase: self.phase(),
        }
    }

    // === Rolling ===

    /// Start a roll.
    ///
    /// Returns `None` (and changes nothing) if the match is won, a roll is
    /// already tumbling, or an earlier roll has not been spent.
    pub fn begin_roll(&mut self) -> Option<RollTicket> {
        if self.winner.is_some() || self.roll_in_progress || self.dice_value.is_some() {
            debug!(phase = ?self.phase(), "roll request ignored");
            return None;
        }

        self.roll_in_progress = true;
        debug!(player = %self.current_player, "roll started");
        Some(RollTicket { epoch: self.epoch })
    }

    /// Draw the die for a started roll.
    pub fn finish_roll(&mut self, ticket: RollTicket) -> RollOutcome {
        if !self.ticket_is_live(ticket) {
            return RollOutcome::Stale;
        }
        let value = self.rng.roll_die();
        self.settle_roll(value)
    }

    /// Resolve a started roll with a known value instead of drawing.
    ///
    /// For scripted dice (replays, tests, physical dice adapters). A value
    /// outside 1..=6 is `Ignored` and the roll stays pending.
    pub fn finish_roll_with(&mut self, ticket: RollTicket, value: u8) -> RollOutcome {
        if !is_die_value(value) {
            debug!(value, "die value out of range ignored");
            return RollOutcome::Ignored;
        }
        if !self.ticket_is_live(ticket) {
            return RollOutcome::Stale;
        }
        self.settle_roll(value)
    }

    /// Roll with no suspension.
    pub fn roll_now(&mut self) -> RollOutcome {
        match self.begin_roll() {
            Some(ticket) => self.finish_roll(ticket),
            None => RollOutcome::Ignored,
        }
    }

    /// Roll a known value with no suspension.
    pub fn roll_now_with(&mut self, value: u8) -> RollOutcome {
        if !is_die_value(value) {
            debug!(value, "die value out of range ignored");
            return RollOutcome::Ignored;
        }
        match self.begin_roll() {
            Some(ticket) => self.finish_roll_with(ticket, value),
            None => RollOutcome::Ignored,
        }
    }

    fn ticket_is_live(&self, ticket: RollTicket) -> bool {
        let live = ticket.epoch == self.epoch && self.roll_in_progress;
        if !live {
            debug!(ticket_epoch = ticket.epoch, epoch = self.epoch, "stale roll discarded");
        }
        live
    }

    fn settle_roll(&mut self, value: u8) -> RollOutcome {
        let player = self.current_player;
        self.roll_in_progress = false;
        self.dice_value = Some(value);

        if self.movable_pawns(player, value).is_empty() {
            let next = player.next();
            self.dice_value = None;
            self.current_player = next;
            self.push_log(format!("{player} rolled a {value} but has no moves."));
            info!(%player, value, %next, "no legal moves, turn passed");
            RollOutcome::Passed { player, value, next }
        } else {
            self.push_log(format!("{player} rolled a {value}."));
            debug!(%player, value, "roll settled");
            RollOutcome::AwaitingMove { player, value }
        }
    }

    // === Moving ===

    /// Spend the pending roll moving `pawn_id`.
    ///
    /// Returns `None` (and changes nothing) if no roll is pending, the match
    /// is won, the pawn is not the current player's, or the move is illegal.
    pub fn request_move(&mut self, pawn_id: PawnId) -> Option<MoveReport> {
        let roll = self.dice_value?;
        if self.winner.is_some() || pawn_id.color() != self.current_player {
            debug!(pawn = %pawn_id, "move request ignored");
            return None;
        }

        let pawn = *self.pawn(pawn_id);
        let Some(plan) = MovePlan::new(&self.pawns, &pawn, roll) else {
            debug!(pawn = %pawn_id, roll, "illegal move ignored");
            return None;
        };

        Some(self.commit(plan))
    }

    fn commit(&mut self, plan: MovePlan) -> MoveReport {
        let mover = self.current_player;

        for &victim in &plan.captured {
            self.pawns[victim.index()].position = Position::Nest;
        }
        self.pawns[plan.pawn.index()].position = plan.to;

        let events = describe(&plan);
        for line in log_lines(&plan) {
            self.push_log(line);
        }

        let won = self.pawns.iter().filter(|p| p.color() == mover).all(|p| p.position.is_finished());
        if won {
            self.winner = Some(mover);
            self.push_log(format!("{mover} wins the match!"));
            info!(winner = %mover, "match won");
        }

        self.current_player = if plan.roll == DIE_FACES && !won { mover } else { mover.next() };
        self.dice_value = None;

        info!(
            pawn = %plan.pawn,
            from = %plan.from,
            to = %plan.to,
            captured = plan.captured.len(),
            next = %self.current_player,
            "move committed"
        );

        MoveReport {
            plan,
            events,
            winner: self.winner,
            next_player: self.current_player,
        }
    }

    // === Setup ===

    /// Restore the opening configuration. Themes are kept.
    pub fn reset(&mut self) {
        self.pawns = initial_pawns();
        self.current_player = Color::FIRST;
        self.dice_value = None;
        self.roll_in_progress = false;
        self.winner = None;
        self.log = Vector::unit(RESET_MESSAGE.to_string());
        self.epoch += 1;
        info!(epoch = self.epoch, "match reset");
    }

    /// Replace the cosmetic team themes.
    pub fn set_themes(&mut self, themes: ThemeMap) {
        self.themes = themes;
    }

    fn push_log(&mut self, line: String) {
        self.log.push_front(line);
    }

    /// Place a pawn directly. Positions set this way skip every rule.
    #[cfg(test)]
    pub(crate) fn place(&mut self, id: PawnId, position: Position) {
        self.pawns[id.index()].position = position;
    }
}

/// Whether `value` is a face of the die.
#[must_use]
pub fn is_die_value(value: u8) -> bool {
    (1..=DIE_FACES).contains(&value)
}

fn initial_pawns() -> Vector<Pawn> {
    let pawns: Vector<Pawn> = PawnId::all().map(Pawn::in_nest).collect();
    debug_assert_eq!(pawns.len(), PAWN_COUNT);
    pawns
}

/// Events for a committed move: the mover's headline event, then one
/// `Captured` per victim.
fn describe(plan: &MovePlan) -> Vec<GameEvent> {
    let color = plan.pawn.color();
    let mover = GameEvent::new(headline(plan), color).with_pawn(plan.pawn);
    let mover = match mover.kind {
        EventKind::Capture => {
            let victims: Vec<String> = plan.captured.iter().map(ToString::to_string).collect();
            mover.with_context(format!("captured {}", victims.join(", ")))
        }
        EventKind::Home => mover.with_context("reached home"),
        EventKind::Start => mover.with_context("left the nest"),
        _ => mover.with_context(format!("moved to {}", plan.to)),
    };

    let mut events = Vec::with_capacity(1 + plan.captured.len());
    events.push(mover);
    events.extend(plan.captured.iter().map(|&victim| {
        GameEvent::new(EventKind::Captured, victim.color())
            .with_pawn(victim)
            .with_context(format!("captured by {}", plan.pawn))
    }));
    events
}

/// Capture beats home beats start beats a plain move.
fn headline(plan: &MovePlan) -> EventKind {
    if !plan.captured.is_empty() {
        EventKind::Capture
    } else if plan.reaches_home() {
        EventKind::Home
    } else if plan.exits_nest() {
        EventKind::Start
    } else {
        EventKind::Move
    }
}

fn log_lines(plan: &MovePlan) -> Vec<String> {
    let pawn = plan.pawn;
    let mut lines = vec![if plan.exits_nest() {
        format!("{pawn} left the nest.")
    } else if plan.reaches_home() {
        format!("{pawn} reached home!")
    } else {
        format!("{pawn} moved from {} to {}.", plan.from, plan.to)
    }];
    lines.extend(plan.captured.iter().map(|victim| format!("{pawn} captured {victim}!")));
    lines
}
