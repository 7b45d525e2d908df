//! Team narration.
//!
//! Listens to match events and produces short in-character one-liners for
//! the team involved. Narration sits entirely outside the match: it reads
//! the event stream, never match state, and its failures end in a fallback
//! line instead of an error.
//!
//! ## Backends
//!
//! - [`TemplateNarrator`]: fixed lines per event kind, no I/O
//! - [`RemoteNarrator`]: a hosted text generation model, prompted with the
//!   team's personality
//!
//! [`build_narrator`] picks one from [`NarrationConfig`](crate::core::NarrationConfig).
//! [`NarrationService`] drives it from an event subscription.

mod narrator;
mod remote;
mod service;

pub use narrator::{
    build_narrator, personality, template_lines, NarrationError, NarrationRequest, Narrator, TemplateNarrator,
    FALLBACK_LINE,
};
pub use remote::RemoteNarrator;
pub use service::{NarrationService, TranscriptEntry};
