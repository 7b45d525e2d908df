//! Remote narration through a hosted `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::narrator::{personality, NarrationError, NarrationRequest, Narrator};
use crate::core::NarrationConfig;

/// Narrates with a text generation model, prompted per team personality.
#[derive(Clone, Debug)]
pub struct RemoteNarrator {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl RemoteNarrator {
    /// Build a narrator for `config`, reading the key from `config.api_key_env`.
    pub fn from_config(config: &NarrationConfig) -> Result<Self, NarrationError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| NarrationError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_key(config, api_key)
    }

    /// Build a narrator for `config` with an explicit key.
    pub fn with_key(config: &NarrationConfig, api_key: impl Into<String>) -> Result<Self, NarrationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            url: generate_url(config),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Narrator for RemoteNarrator {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[instrument(skip(self, request), fields(color = %request.color, kind = %request.kind))]
    async fn narrate(&self, request: &NarrationRequest) -> Result<String, NarrationError> {
        let body = GenerateRequest::from_prompt(prompt(request));

        let response: GenerateResponse = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let line = response.text().ok_or(NarrationError::EmptyResponse)?;
        debug!(%line, "remote line received");
        Ok(line)
    }
}

fn generate_url(config: &NarrationConfig) -> String {
    format!(
        "{}/models/{}:generateContent",
        config.endpoint.trim_end_matches('/'),
        config.model
    )
}

/// Prompt asking for a one-liner in the team's voice.
fn prompt(request: &NarrationRequest) -> String {
    format!(
        "You are a Ludo pawn with the following personality: {}\n\
         You just experienced a game event: {}.\n\
         Context: {}.\n\
         Give a short, punchy one-liner (max 10 words) expressing your reaction.\n\
         Do not use quotes or prefixes, just the line itself.",
        personality(request.color),
        request.kind,
        request.context.as_deref().unwrap_or("Normal gameplay"),
    )
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// First candidate's text, trimmed of whitespace and stray quotes.
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        let line = text.trim().trim_matches('"').trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}
