//! HTTP client for OpenAI-compatible chat completion APIs.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{CompletionBackend, CompletionFuture};
use crate::classifier::ClassificationError;
use crate::config::TriageConfig;

/// Client-side timeout for one completion request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// Role of a message in the conversation. The triage prompt is always sent
/// as a single user turn.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

#[derive(Serialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Token usage statistics, logged at debug level.
#[derive(Deserialize, Debug)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async client bound to one endpoint, model, key, and temperature.
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl ChatClient {
    /// Build a client from the startup configuration.
    pub fn new(config: &TriageConfig) -> Result<Self, ClassificationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("triage-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: completions_url(&config.api_base_url),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a chat completion request and return the first choice's content.
    pub async fn chat(&self, body: &ChatRequest) -> Result<Option<String>, ClassificationError> {
        debug!(
            "LLM request: model={}, messages={}, temp={}",
            body.model,
            body.messages.len(),
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(ClassificationError::Http {
                status: status.as_u16(),
                body: api_error_message(&text).unwrap_or(text),
            });
        }

        let parsed: RawChatResponse = serde_json::from_str(&text)
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ClassificationError::Api(err.message));
        }

        if let Some(usage) = &parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        let choice = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| {
                ClassificationError::MalformedResponse("response has no choices".into())
            })?;

        debug!(
            "Finish reason: {}",
            choice.finish_reason.as_deref().unwrap_or("none")
        );
        Ok(choice.message.content)
    }
}

impl CompletionBackend for ChatClient {
    fn complete(&self, prompt: &str) -> CompletionFuture<'_> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
        };
        Box::pin(async move {
            self.chat(&body)
                .await?
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .ok_or(ClassificationError::EmptyResponse)
        })
    }
}

/// `https://host/v1` → `https://host/v1/chat/completions`.
fn completions_url(base: &str) -> String {
    format!("{}/chat/completions", base.trim_end_matches('/'))
}

/// Pull `error.message` out of an OpenAI-style error body, if present.
fn api_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ApiErrorResponse,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
