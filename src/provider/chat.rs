use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::StudioError;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse};

/// Client for an OpenAI-compatible `/chat/completions` endpoint
/// (DeepSeek by default).
pub struct ChatClient {
    url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout_secs: u64,
    client: Client,
}

impl ChatClient {
    pub fn new(cfg: &Config, api_key: Option<String>) -> Result<Self, StudioError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| StudioError::Upstream(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: cfg.api_url.clone(),
            model: cfg.model.clone(),
            api_key,
            api_key_env: cfg.api_key_env.clone(),
            timeout_secs: cfg.timeout_secs,
            client,
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> StudioError {
        if e.is_timeout() {
            StudioError::Timeout(self.timeout_secs)
        } else {
            StudioError::Upstream(format!("request failed: {e}"))
        }
    }
}

#[async_trait]
impl super::Completion for ChatClient {
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String, StudioError> {
        self.ready()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let body = ChatRequest {
            model: self.model.clone(),
            temperature,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        };

        debug!(url = %self.url, model = %self.model, temperature, "POST chat completion");
        let started = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_transport(e))?;
        debug!(%status, elapsed_ms = started.elapsed().as_millis() as u64, bytes = text.len(), "completion response");

        if !status.is_success() {
            warn!(%status, "completion endpoint returned an error");
            return Err(StudioError::Upstream(format!("API error ({status}): {text}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| StudioError::Upstream(format!("failed to parse response: {e}\nRaw: {text}")))?;

        parsed
            .first_content()
            .map(|c| c.trim().to_string())
            .ok_or_else(|| StudioError::Upstream("response contained no choices".into()))
    }

    fn ready(&self) -> Result<(), StudioError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(StudioError::Auth(self.api_key_env.clone())),
        }
    }
}
