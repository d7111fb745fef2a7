//! OpenAI-compatible chat completions client.
//!
//! ### Protocol
//!
//! - **Endpoint**: `{base_url}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <api key>`
//! - **Request**: `{model, messages, temperature}`
//! - **Response**: the reported `model` and `choices[0].message.content`
//!
//! No retries: a failed request is reported once to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lcats_core::config::AppConfig;
use reqwest::header;
use serde::{Deserialize, Serialize};

use super::{Completion, CompletionClient, CompletionError, Message};

/// Default base URL for the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key, sent as a bearer token.
    pub api_key: String,
    /// Base URL (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Model requested for every completion (default: gpt-3.5-turbo).
    pub model: String,
    /// Sampling temperature (default: 0.2).
    pub temperature: f32,
    /// Request timeout (default: 120s).
    pub timeout: Duration,
    /// User-agent string (default: lcats/0.1).
    pub user_agent: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            timeout: DEFAULT_TIMEOUT,
            user_agent: "lcats/0.1".to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Build from application configuration.
    ///
    /// Fails with [`CompletionError::MissingApiKey`] if no key is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, CompletionError> {
        let api_key = config.require_api_key().map_err(|_| CompletionError::MissingApiKey)?;
        let completion = &config.completion;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: completion.base_url.clone(),
            model: completion.model.clone(),
            temperature: completion.temperature,
            timeout: completion.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for OpenAI-compatible chat completion APIs.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        if config.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| CompletionError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }
}

impl CompletionClient for OpenAiClient {
    fn respond(&self, messages: &[Message]) -> Result<Completion, CompletionError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest { model: &self.config.model, messages, temperature: self.config.temperature };

        tracing::debug!("requesting completion: model={} messages={}", self.config.model, messages.len());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        tracing::debug!("completion response status: {}", status);

        if !status.is_success() {
            return Err(CompletionError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes()?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| CompletionError::Parse(e.to_string()))?;

        let choice = parsed.choices.into_iter().next().ok_or(CompletionError::EmptyResponse)?;
        let model = parsed.model.unwrap_or_else(|| self.config.model.clone());

        tracing::debug!("completion finished in {:?}", start.elapsed());

        Ok(Completion { model, text: choice.message.content.unwrap_or_default() })
    }
}
