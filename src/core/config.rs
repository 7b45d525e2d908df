//! Match configuration.
//!
//! A match is configured once, before it starts:
//! - `MatchConfig`: dice seed, roll suspension, team themes, narration
//! - `NarrationConfig`: which narrator backend speaks for the teams
//!
//! Configurations can be built in code with the `with_*` methods or loaded
//! from TOML:
//!
//! ```
//! use ludo_echoes::core::{Color, MatchConfig};
//!
//! let config = MatchConfig::from_toml_str(r#"
//!     seed = 7
//!     roll_delay_ms = 0
//!
//!     [themes]
//!     GOLD = "desert caravan"
//! "#).unwrap();
//!
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.themes[Color::Gold], "desert caravan");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::color::ColorMap;

/// Cosmetic free-text theme per team. Never read by the rules.
pub type ThemeMap = ColorMap<String>;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Match configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Dice seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// How long a roll stays "tumbling" before its value is visible.
    pub roll_delay_ms: u64,

    /// Team themes shown by presentation layers.
    pub themes: ThemeMap,

    /// Narration settings.
    pub narration: NarrationConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            roll_delay_ms: 600,
            themes: ThemeMap::with_default(),
            narration: NarrationConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Roll suspension as a `Duration`.
    #[must_use]
    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms)
    }

    /// Use a fixed dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the roll suspension.
    #[must_use]
    pub fn with_roll_delay_ms(mut self, delay_ms: u64) -> Self {
        self.roll_delay_ms = delay_ms;
        self
    }

    /// Set the team themes.
    #[must_use]
    pub fn with_themes(mut self, themes: ThemeMap) -> Self {
        self.themes = themes;
        self
    }

    /// Set the narration settings.
    #[must_use]
    pub fn with_narration(mut self, narration: NarrationConfig) -> Self {
        self.narration = narration;
        self
    }
}

/// Which narrator implementation to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationBackend {
    /// Fixed template lines, no network.
    Template,
    /// Remote text generation, falling back to templates on failure.
    Remote,
}

/// Narration configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    pub backend: NarrationBackend,

    /// Chance that a plain move is narrated at all (0.0-1.0).
    /// Captures, arrivals and nest exits are always narrated.
    pub move_chatter_probability: f64,

    /// Base URL of the generation endpoint.
    pub endpoint: String,

    /// Model name passed to the endpoint.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout for remote generation.
    pub timeout_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            backend: NarrationBackend::Template,
            move_chatter_probability: 0.3,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl NarrationConfig {
    /// Select the remote backend.
    #[must_use]
    pub fn remote(mut self) -> Self {
        self.backend = NarrationBackend::Remote;
        self
    }

    /// Set the plain-move narration probability.
    #[must_use]
    pub fn with_move_chatter(mut self, probability: f64) -> Self {
        self.move_chatter_probability = probability;
        self
    }

    /// Set the generation endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key environment variable.
    #[must_use]
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }
}
