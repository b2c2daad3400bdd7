//! Completion Client
//!
//! Talks to the OpenRouter chat-completions endpoint. Every failure on the
//! non-streaming path ends in a mock reply, so `generate_response` never
//! errors; `try_complete` is the fallible core it wraps.

use crate::constants::*;
use crate::mock::generate_mock;
use crate::prompt::assemble_messages;
use crate::sanitize::sanitize;
use crate::specs::openai::{ChatCompletion, OpenAiRequest};
use crate::types::*;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// `None` (or empty) selects mock mode.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Whole-request deadline for non-streaming calls. Streaming calls use it
    /// as the deadline for response headers and for each idle gap between lines.
    pub timeout: Duration,
    pub referer: String,
    pub app_title: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

pub struct BridAssistant {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl BridAssistant {
    pub fn new(client: reqwest::Client, config: UpstreamConfig) -> Self {
        let config = UpstreamConfig {
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            ..config
        };
        Self { client, config }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn build_request(&self, messages: Vec<Message>, stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream,
            stop: REASONING_STOP_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Posts the request and maps non-2xx statuses to `Upstream`.
    /// No client-level timeout is applied here; callers bound the wait.
    pub(crate) async fn send(&self, request: &OpenAiRequest) -> Result<reqwest::Response> {
        let api_key = match self.config.api_key.as_deref() {
            Some(k) => k,
            None => {
                return Err(AssistantError::InvalidRequest(
                    "no upstream credential configured".to_string(),
                )
                .into())
            }
        };

        tracing::debug!(
            "[⚙️  -> ☁️ ] POST {} model={} messages={} stream={}",
            self.config.endpoint(),
            request.model,
            request.messages.len(),
            request.stream
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("[☁️  -> ⚙️ ] Status: {}", status);
        if status.is_success() {
            Ok(response)
        } else {
            let error_body = match response.text().await {
                Ok(text) => text,
                Err(_) => "Unknown error".to_string(),
            };
            Err(AssistantError::Upstream(status, error_body).into())
        }
    }

    /// One non-streaming completion, sanitized. A reply with no content yields
    /// the empty-completion fallback rather than an error.
    pub async fn try_complete(
        &self,
        message: &str,
        history: &[Message],
        location: UserLocation,
    ) -> Result<String> {
        let request = self.build_request(assemble_messages(message, history, location), false);

        let call = async {
            let response = self.send(&request).await?;
            let body: ChatCompletion = response.json().await?;
            Ok::<_, ObservedError>(body)
        };

        let body = match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AssistantError::Timeout(format!(
                    "no completion within {}s",
                    self.config.timeout.as_secs()
                ))
                .into())
            }
        };

        if let Some(usage) = body.usage {
            tracing::debug!(
                "Usage: prompt={} completion={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        match body.first_content() {
            Some(raw) if !raw.trim().is_empty() => Ok(sanitize(raw)),
            _ => {
                tracing::warn!("[☁️  -> ⚙️ ] Completion carried no content");
                Ok(EMPTY_COMPLETION_FALLBACK.to_string())
            }
        }
    }

    /// Opens a `stream=true` completion. The timeout covers the wait for
    /// response headers only; the body is read by the relay.
    pub async fn open_stream(
        &self,
        message: &str,
        history: &[Message],
        location: UserLocation,
    ) -> Result<reqwest::Response> {
        let request = self.build_request(assemble_messages(message, history, location), true);
        match tokio::time::timeout(self.config.timeout, self.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(AssistantError::Timeout(format!(
                "stream did not open within {}s",
                self.config.timeout.as_secs()
            ))
            .into()),
        }
    }

    /// Always produces a reply. Mock mode and any upstream failure route to
    /// the mock responder.
    pub async fn generate_response(
        &self,
        message: &str,
        history: &[Message],
        location: UserLocation,
    ) -> String {
        if !self.has_credential() {
            tracing::debug!("[🎭] No upstream credential, answering from mock");
            return generate_mock(message, location);
        }

        match self.try_complete(message, history, location).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Upstream completion failed, using mock reply: {}", e.inner);
                generate_mock(message, location)
            }
        }
    }
}
