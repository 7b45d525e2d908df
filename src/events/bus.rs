//! Outbound event channel.
//!
//! A thin wrapper over a `tokio::sync::broadcast` channel. Publishing never
//! blocks and never fails: with no subscribers the event is dropped, and a
//! subscriber that falls too far behind loses the oldest events.

use tokio::sync::broadcast;
use tracing::trace;

use super::event::GameEvent;

/// Events buffered per subscriber before old ones are dropped.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fire-and-forget event publisher.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Create a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Start receiving events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish events in order.
    pub fn publish(&self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            // No subscribers is fine; events are notifications.
            if self.sender.send(event).is_err() {
                trace!("event dropped, no subscribers");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
