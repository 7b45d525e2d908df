use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::remote::RemoteNarrator;
use crate::core::{Color, GameRng, NarrationBackend, NarrationConfig};
use crate::events::{EventKind, GameEvent};

/// Line used when a narrator fails.
pub const FALLBACK_LINE: &str = "Moving out!";

/// Narration errors. Never surfaced to the match.
#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
    #[error("Narration request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Narration response contained no text")]
    EmptyResponse,
}

/// What a narrator is asked to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrationRequest {
    /// Team speaking.
    pub color: Color,
    pub kind: EventKind,
    /// Event detail, if any.
    pub context: Option<String>,
}

impl From<&GameEvent> for NarrationRequest {
    fn from(event: &GameEvent) -> Self {
        Self {
            color: event.color,
            kind: event.kind,
            context: event.context.clone(),
        }
    }
}

/// Produces a one-line reaction for a team.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// React to `request` in the team's voice.
    async fn narrate(&self, request: &NarrationRequest) -> Result<String, NarrationError>;
}

/// Personality each team speaks with.
#[must_use]
pub const fn personality(color: Color) -> &'static str {
    match color {
        Color::Crimson => "Aggressive, boastful, competitive, loves trash-talking.",
        Color::Sapphire => "Strategic, calm, analytical, focused on the long game.",
        Color::Gold => "Friendly, supportive, optimistic, always cheering.",
        Color::Emerald => "Impulsive, mischievous, unpredictable, loves chaos.",
    }
}

/// Built-in lines for an event kind.
#[must_use]
pub const fn template_lines(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Move => &["Taking a step forward!", "On the move.", "Victory is closer."],
        EventKind::Capture => &["Gotcha!", "Move aside!", "One down, many more to go."],
        EventKind::Captured => &["I'll be back!", "Not again!", "This isn't over."],
        EventKind::Home => &["Home sweet home!", "Mission accomplished!", "I've arrived."],
        EventKind::Start => &["Let's do this!", "Ready for action.", "Finally out of the nest!"],
    }
}

/// Picks a fixed line per event kind.
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use ludo_echoes::core::{Color, GameRng};
/// use ludo_echoes::events::EventKind;
/// use ludo_echoes::narration::{template_lines, NarrationRequest, Narrator, TemplateNarrator};
///
/// let narrator = TemplateNarrator::new(GameRng::new(1));
/// let request = NarrationRequest { color: Color::Gold, kind: EventKind::Home, context: None };
/// let line = narrator.narrate(&request).await.unwrap();
/// assert!(template_lines(EventKind::Home).contains(&line.as_str()));
/// # });
/// ```
#[derive(Debug)]
pub struct TemplateNarrator {
    lines: FxHashMap<EventKind, Vec<String>>,
    rng: Mutex<GameRng>,
}

impl TemplateNarrator {
    /// Narrator with the built-in lines.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        let lines = EventKind::ALL
            .iter()
            .map(|&kind| (kind, template_lines(kind).iter().map(|l| (*l).to_string()).collect()))
            .collect();
        Self {
            lines,
            rng: Mutex::new(rng),
        }
    }

    /// Replace the lines for one event kind (builder pattern).
    ///
    /// # Panics
    ///
    /// If `lines` is empty.
    #[must_use]
    pub fn with_lines(mut self, kind: EventKind, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        assert!(!lines.is_empty(), "template narrator needs at least one {kind} line");
        self.lines.insert(kind, lines);
        self
    }
}

#[async_trait]
impl Narrator for TemplateNarrator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn narrate(&self, request: &NarrationRequest) -> Result<String, NarrationError> {
        let lines = self.lines.get(&request.kind).map(Vec::as_slice).unwrap_or_default();
        let mut rng = self.rng.lock().await;
        Ok(rng.choose(lines).map_or_else(|| FALLBACK_LINE.to_string(), Clone::clone))
    }
}

/// Build the narrator `config` asks for.
///
/// A remote narrator without its API key, or whose client cannot be built,
/// degrades to templates.
#[must_use]
pub fn build_narrator(config: &NarrationConfig, rng: GameRng) -> Arc<dyn Narrator> {
    match config.backend {
        NarrationBackend::Template => Arc::new(TemplateNarrator::new(rng)),
        NarrationBackend::Remote => match RemoteNarrator::from_config(config) {
            Ok(remote) => {
                info!(model = %config.model, "remote narration enabled");
                Arc::new(remote)
            }
            Err(err) => {
                warn!(%err, "remote narration unavailable, using templates");
                Arc::new(TemplateNarrator::new(rng))
            }
        },
    }
}
