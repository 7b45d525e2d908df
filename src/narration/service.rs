//! Background narration task.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::narrator::{NarrationRequest, Narrator, FALLBACK_LINE};
use crate::core::{Color, GameRng, NarrationConfig};
use crate::events::{EventKind, GameEvent};

/// One narrated line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub color: Color,
    pub line: String,
}

impl std::fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.color, self.line)
    }
}

/// Narrates events from a subscription until the event stream closes.
///
/// Events are narrated one at a time, in publication order. Plain moves
/// are narrated only some of the time; everything else always is.
#[derive(Debug)]
pub struct NarrationService {
    transcript: watch::Receiver<Vector<TranscriptEntry>>,
    task: JoinHandle<()>,
}

impl NarrationService {
    /// Start narrating `events` on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        events: broadcast::Receiver<GameEvent>,
        narrator: Arc<dyn Narrator>,
        config: &NarrationConfig,
    ) -> Self {
        Self::spawn_with_rng(events, narrator, config, GameRng::from_entropy())
    }

    /// As `spawn`, with a fixed RNG deciding which plain moves are narrated.
    #[must_use]
    pub fn spawn_with_rng(
        events: broadcast::Receiver<GameEvent>,
        narrator: Arc<dyn Narrator>,
        config: &NarrationConfig,
        rng: GameRng,
    ) -> Self {
        let (sender, transcript) = watch::channel(Vector::new());
        let worker = Worker {
            events,
            narrator,
            transcript: sender,
            rng,
            move_chatter_probability: config.move_chatter_probability,
        };
        Self {
            transcript,
            task: tokio::spawn(worker.run()),
        }
    }

    /// Narrated lines so far, newest first.
    #[must_use]
    pub fn transcript(&self) -> Vector<TranscriptEntry> {
        self.transcript.borrow().clone()
    }

    /// Watch the transcript change.
    #[must_use]
    pub fn watch_transcript(&self) -> watch::Receiver<Vector<TranscriptEntry>> {
        self.transcript.clone()
    }

    /// Wait for the event stream to close, then return the final transcript.
    pub async fn join(self) -> Vector<TranscriptEntry> {
        if let Err(err) = self.task.await {
            warn!(%err, "narration task ended abnormally");
        }
        self.transcript.borrow().clone()
    }

    /// Stop narrating immediately.
    pub fn abort(&self) {
        self.task.abort();
    }
}

struct Worker {
    events: broadcast::Receiver<GameEvent>,
    narrator: Arc<dyn Narrator>,
    transcript: watch::Sender<Vector<TranscriptEntry>>,
    rng: GameRng,
    move_chatter_probability: f64,
}

impl Worker {
    async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => self.handle(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "narration fell behind, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("event stream closed, narration stopped");
    }

    async fn handle(&mut self, event: GameEvent) {
        if event.kind == EventKind::Move && !self.rng.gen_bool(self.move_chatter_probability) {
            return;
        }

        let request = NarrationRequest::from(&event);
        let line = match self.narrator.narrate(&request).await {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, narrator = self.narrator.name(), "narration failed, using fallback");
                FALLBACK_LINE.to_string()
            }
        };

        debug!(color = %event.color, %line, "narrated");
        let entry = TranscriptEntry {
            color: event.color,
            line,
        };
        self.transcript.send_modify(|lines| lines.push_front(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::{NarrationError, TemplateNarrator};
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl Narrator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn narrate(&self, _request: &NarrationRequest) -> Result<String, NarrationError> {
            Err(NarrationError::EmptyResponse)
        }
    }

    #[test]
    fn test_entry_display() {
        let entry = TranscriptEntry {
            color: Color::Sapphire,
            line: "Patience.".to_string(),
        };
        assert_eq!(entry.to_string(), "[SAPPHIRE] Patience.");
    }

    #[tokio::test]
    async fn test_failure_uses_fallback_line() {
        let (tx, rx) = broadcast::channel(8);
        let service = NarrationService::spawn(rx, Arc::new(Failing), &NarrationConfig::default());

        tx.send(GameEvent::new(EventKind::Start, Color::Gold)).unwrap();
        drop(tx);

        let transcript = service.join().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].to_string(), "[GOLD] Moving out!");
    }

    #[tokio::test]
    async fn test_plain_moves_can_be_silenced() {
        let (tx, rx) = broadcast::channel(8);
        let config = NarrationConfig::default().with_move_chatter(0.0);
        let narrator = Arc::new(TemplateNarrator::new(GameRng::new(1)));
        let service = NarrationService::spawn_with_rng(rx, narrator, &config, GameRng::new(2));

        tx.send(GameEvent::new(EventKind::Move, Color::Crimson)).unwrap();
        tx.send(GameEvent::new(EventKind::Captured, Color::Emerald)).unwrap();
        drop(tx);

        let transcript = service.join().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].color, Color::Emerald);
    }
}
