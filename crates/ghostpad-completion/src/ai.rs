//! AI inline completion
//!
//! One call walks the whole path: parked retry, request budget, endpoint
//! fetch raced against the host's cancellation token, then the filter
//! pipeline. Every failure degrades to an outcome without a suggestion.

use ghostpad_providers::{clean_completion_text, ChatClient, OpenAiCompatibleClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::CompletionConfig;
use crate::error::CompletionResult;
use crate::filter::{CompletionFilterPipeline, Rejection, SuggestionContext};
use crate::host::DocumentView;
use crate::prompt::{PromptBuilder, PromptContext};
use crate::retry::{self, RetrySlot, RetrySuggestion};
use crate::scheduler::EventSender;
use crate::throttle::CompletionRequestThrottler;
use crate::types::{Position, SuggestionSource};

/// Text to offer at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSuggestion {
    pub text: String,
    pub source: SuggestionSource,
}

/// Result of one AI completion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Suggestion(AiSuggestion),
    /// The filter rejected the answer; a retry has been scheduled
    Rejected(Rejection),
    /// The request budget is exhausted
    Throttled,
    /// AI disabled, transport failure or empty answer
    Empty,
    /// The host cancelled the request
    Cancelled,
}

impl CompletionOutcome {
    pub fn suggestion(&self) -> Option<&AiSuggestion> {
        match self {
            CompletionOutcome::Suggestion(s) => Some(s),
            _ => None,
        }
    }
}

pub struct AiCompletionService {
    client: Option<Arc<dyn ChatClient>>,
    prompts: PromptBuilder,
    throttler: CompletionRequestThrottler,
    pipeline: CompletionFilterPipeline,
    retry: RetrySlot,
    context_before_chars: usize,
    context_after_chars: usize,
    events: EventSender,
}

impl AiCompletionService {
    /// Build the service with the HTTP client when AI is configured
    pub fn from_config(config: &CompletionConfig, events: EventSender) -> CompletionResult<Self> {
        let client: Option<Arc<dyn ChatClient>> = if config.ai.is_configured() {
            let client = OpenAiCompatibleClient::with_proxy(
                &config.ai,
                config.proxy.as_ref(),
                config.request.timeout(),
            )?;
            info!("AI completion enabled via {}", client.endpoint());
            Some(Arc::new(client))
        } else {
            debug!("AI completion disabled");
            None
        };
        Ok(Self::with_client(config, client, events))
    }

    /// Build the service around any chat client
    pub fn with_client(
        config: &CompletionConfig,
        client: Option<Arc<dyn ChatClient>>,
        events: EventSender,
    ) -> Self {
        Self {
            client,
            prompts: PromptBuilder::new(config.ai.model.clone(), config.request, config.retry),
            throttler: CompletionRequestThrottler::from_settings(&config.throttle),
            pipeline: CompletionFilterPipeline::new(),
            retry: RetrySlot::new(&config.retry),
            context_before_chars: config.request.context_before_chars,
            context_after_chars: config.request.context_after_chars,
            events,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn throttler(&self) -> &CompletionRequestThrottler {
        &self.throttler
    }

    pub fn retry_slot(&self) -> &RetrySlot {
        &self.retry
    }

    pub fn deliver_retry(&mut self, suggestion: RetrySuggestion) {
        self.retry.deliver(suggestion);
    }

    /// Drop any scheduled or parked retry
    pub fn clear_retry(&mut self) {
        self.retry.clear();
    }

    /// Fetch, filter and return a suggestion for `position`
    pub async fn complete<D: DocumentView + ?Sized>(
        &mut self,
        document: &D,
        position: Position,
        cancel: &CancellationToken,
    ) -> CompletionOutcome {
        if cancel.is_cancelled() {
            return CompletionOutcome::Cancelled;
        }
        let now = retry::now();
        if let Some(ready) = self.retry.take_for(position, now) {
            info!("Serving retry suggestion at {}", position);
            return CompletionOutcome::Suggestion(AiSuggestion {
                text: ready.text,
                source: SuggestionSource::Retry,
            });
        }

        let Some(client) = self.client.clone() else {
            return CompletionOutcome::Empty;
        };
        if !self.throttler.try_acquire_at(now) {
            return CompletionOutcome::Throttled;
        }

        let filter_context = SuggestionContext::from_document(document, position);
        let prompt_context = PromptContext::from_document(
            document,
            position,
            self.context_before_chars,
            self.context_after_chars,
        );
        let request = self.prompts.primary(&prompt_context);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Completion request at {} cancelled", position);
                return CompletionOutcome::Cancelled;
            }
            result = client.chat(request) => result,
        };

        let text = match response {
            Ok(response) => clean_completion_text(&response.content),
            Err(e) if e.is_transport() => {
                warn!("Completion endpoint unreachable: {}", e);
                return CompletionOutcome::Empty;
            }
            Err(e) => {
                error!("Completion request failed: {}", e);
                return CompletionOutcome::Empty;
            }
        };
        if text.trim().is_empty() {
            debug!("Endpoint returned no usable text");
            return CompletionOutcome::Empty;
        }

        match self.pipeline.evaluate(&text, &filter_context) {
            Ok(()) => CompletionOutcome::Suggestion(AiSuggestion {
                text,
                source: SuggestionSource::Ai,
            }),
            Err(rejection) => {
                info!(
                    "Suggestion rejected by {} at {}, scheduling retry",
                    rejection.rule, position
                );
                let retry_request = self.prompts.retry(&prompt_context, &text, &rejection);
                self.retry
                    .schedule(client, retry_request, position, &self.events);
                CompletionOutcome::Rejected(rejection)
            }
        }
    }
}
