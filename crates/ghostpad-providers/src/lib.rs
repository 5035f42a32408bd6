//! Ghostpad providers - remote chat-completion endpoint access
//!
//! Wraps an OpenAI-compatible `/v1/chat/completions` endpoint behind the
//! [`ChatClient`] trait so the completion pipeline can be driven by the real
//! HTTP client or by a test double.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sanitize;

pub use client::{ChatClient, OpenAiCompatibleClient};
pub use config::{AiSettings, ProxySettings, API_KEY_ENV};
pub use error::ProviderError;
pub use models::{ChatRequest, ChatResponse, Message};
pub use sanitize::clean_completion_text;
