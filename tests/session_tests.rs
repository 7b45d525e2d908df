//! Async session behavior: roll suspension, single-writer guards, event
//! publication.
//!
//! Uses tokio's paused clock so the roll delay elapses instantly and
//! deterministically.

use std::time::Duration;

use ludo_echoes::core::{Color, MatchConfig, PawnId, Phase, Position, RollOutcome};
use ludo_echoes::events::EventKind;
use ludo_echoes::session::MatchHandle;

const DELAY: Duration = Duration::from_millis(600);

fn handle() -> MatchHandle {
    MatchHandle::new(&MatchConfig::default().with_seed(5))
}

#[tokio::test(start_paused = true)]
async fn test_default_delay_is_applied() {
    let handle = handle();
    assert_eq!(handle.roll_delay(), DELAY);

    let start = tokio::time::Instant::now();
    handle.request_roll().await;
    assert!(start.elapsed() >= DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_second_roll_during_delay_is_ignored() {
    let handle = handle();

    let roller = handle.clone();
    let first = tokio::spawn(async move { roller.request_roll_with(6).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = handle.snapshot().await;
    assert!(snapshot.roll_in_progress);
    assert_eq!(snapshot.phase, Phase::RollPending);
    assert_eq!(snapshot.dice_value, None);

    assert_eq!(handle.request_roll().await, RollOutcome::Ignored);
    assert!(handle.request_move(PawnId::new(Color::Crimson, 0)).await.is_none());

    let outcome = first.await.unwrap();
    assert_eq!(outcome, RollOutcome::AwaitingMove { player: Color::Crimson, value: 6 });
    assert_eq!(handle.snapshot().await.dice_value, Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_delay_discards_roll() {
    let handle = handle();

    let roller = handle.clone();
    let pending = tokio::spawn(async move { roller.request_roll_with(6).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.reset().await;
    assert_eq!(pending.await.unwrap(), RollOutcome::Stale);

    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.dice_value, None);
    assert!(!snapshot.roll_in_progress);

    // The fresh match accepts a roll again.
    assert_ne!(handle.request_roll().await, RollOutcome::Ignored);
}

#[tokio::test(start_paused = true)]
async fn test_move_events_reach_every_subscriber() {
    let handle = handle();
    let mut first = handle.subscribe();
    let mut second = handle.subscribe();

    handle.request_roll_with(6).await;
    let id = PawnId::new(Color::Crimson, 3);
    handle.request_move(id).await.unwrap();

    for rx in [&mut first, &mut second] {
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Start);
        assert_eq!(event.color, Color::Crimson);
        assert_eq!(event.pawn, Some(id));
    }
    assert_eq!(handle.snapshot().await.pawn(id).position, Position::Path(0));
}

#[tokio::test(start_paused = true)]
async fn test_legal_moves_follow_pending_roll() {
    let handle = handle();
    assert!(handle.legal_moves().await.is_empty());

    handle.request_roll_with(6).await;
    let moves = handle.legal_moves().await;
    assert_eq!(moves.len(), 4);
    assert!(moves.iter().all(|id| id.color() == Color::Crimson));
}

#[tokio::test(start_paused = true)]
async fn test_themes_survive_reset() {
    let handle = handle();
    let mut themes = ludo_echoes::core::ThemeMap::with_default();
    themes[Color::Sapphire] = "deep sea".to_string();

    handle.set_themes(themes).await;
    handle.reset().await;
    assert_eq!(handle.snapshot().await.themes[Color::Sapphire], "deep sea");
}
