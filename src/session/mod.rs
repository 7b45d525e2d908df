//! Async match session.
//!
//! `MatchHandle` is the only way input adapters drive a running match. It
//! serializes every mutation through one async mutex, suspends rolls for the
//! configured delay without holding that mutex, and publishes the events of
//! committed moves on the match's `EventBus`.

mod handle;

pub use handle::MatchHandle;
