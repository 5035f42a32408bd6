//! OpenAI-compatible chat-completion client
//!
//! Speaks `POST {base_url}/v1/chat/completions` with a bearer token; only the
//! first choice's message content is used.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::{AiSettings, ProxySettings};
use crate::error::ProviderError;
use crate::models::{ChatRequest, ChatResponse};
use crate::sanitize::clean_completion_text;

/// Anything that can answer a chat-completion request
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a non-streaming chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Client for endpoints implementing the OpenAI chat-completions shape
pub struct OpenAiCompatibleClient {
    api_key: String,
    client: Client,
    endpoint: String,
}

impl OpenAiCompatibleClient {
    /// Create a client from AI settings
    pub fn new(settings: &AiSettings, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_proxy(settings, None, timeout)
    }

    /// Create a client routed through an optional proxy
    pub fn with_proxy(
        settings: &AiSettings,
        proxy: Option<&ProxySettings>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if settings.api_key.trim().is_empty() {
            return Err(ProviderError::ConfigError("API key is required".to_string()));
        }
        let base_url = settings.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ProviderError::ConfigError("Base URL is required".to_string()));
        }

        let mut builder = Client::builder().timeout(timeout);
        if let Some(proxy) = proxy.filter(|p| p.enabled) {
            builder = apply_proxy(builder, proxy)?;
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::ConfigError(e.to_string()))?;

        Ok(Self {
            api_key: settings.api_key.clone(),
            client,
            endpoint: format!("{}/v1/chat/completions", base_url),
        })
    }

    /// Full endpoint URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get_auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    fn convert_response(response: WireChatResponse) -> Result<ChatResponse, ProviderError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ChatResponse {
            content: clean_completion_text(&content),
            model: response.model,
        })
    }
}

fn apply_proxy(
    mut builder: reqwest::ClientBuilder,
    proxy: &ProxySettings,
) -> Result<reqwest::ClientBuilder, ProviderError> {
    let no_proxy = proxy
        .no_proxy
        .as_deref()
        .and_then(reqwest::NoProxy::from_string);

    if let Some(url) = proxy.http_proxy.as_deref().filter(|u| !u.is_empty()) {
        let p = reqwest::Proxy::http(url)
            .map_err(|e| ProviderError::ConfigError(format!("Invalid HTTP proxy: {}", e)))?
            .no_proxy(no_proxy.clone());
        builder = builder.proxy(p);
    }
    if let Some(url) = proxy.https_proxy.as_deref().filter(|u| !u.is_empty()) {
        let p = reqwest::Proxy::https(url)
            .map_err(|e| ProviderError::ConfigError(format!("Invalid HTTPS proxy: {}", e)))?
            .no_proxy(no_proxy);
        builder = builder.proxy(p);
    }
    Ok(builder)
}

#[async_trait]
impl ChatClient for OpenAiCompatibleClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = WireChatRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        debug!(
            "Sending chat completion request for model {} ({} messages, max_tokens {})",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", self.get_auth_header())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Chat completion request failed: {}", e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Chat completion endpoint error ({}): {}", status, error_text);

            return match status.as_u16() {
                401 | 403 => Err(ProviderError::AuthError),
                429 => Err(ProviderError::RateLimited),
                code => Err(ProviderError::HttpStatus {
                    status: code,
                    message: error_text,
                }),
            };
        }

        let wire: WireChatResponse = response.json().await?;
        Self::convert_response(wire)
    }
}

#[derive(Debug, Serialize)]
struct WireChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireChatResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: Option<WireResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}
