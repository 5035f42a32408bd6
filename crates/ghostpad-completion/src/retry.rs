//! Retry after a filter rejection
//!
//! A rejected suggestion schedules one follow-up request after a fixed delay.
//! Its answer is parked as a [`RetrySuggestion`] and handed out unfiltered to
//! the next request at the same position while it is fresh.

use ghostpad_providers::{clean_completion_text, ChatClient, ChatRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::RetrySettings;
use crate::scheduler::{EventSender, ScheduledTask, SessionEvent};
use crate::types::Position;

/// Answer to a retry request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySuggestion {
    pub text: String,
    pub position: Position,
    pub timestamp: Instant,
}

impl RetrySuggestion {
    pub fn is_valid_at(&self, position: Position, now: Instant, ttl: Duration) -> bool {
        self.position == position && now.saturating_duration_since(self.timestamp) < ttl
    }
}

/// Current time, following the tokio clock so paused-time tests see it move
pub(crate) fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// At most one scheduled retry and one parked retry suggestion
#[derive(Debug)]
pub struct RetrySlot {
    delay: Duration,
    ttl: Duration,
    task: Option<ScheduledTask>,
    ready: Option<RetrySuggestion>,
}

impl RetrySlot {
    pub fn new(settings: &RetrySettings) -> Self {
        Self {
            delay: settings.delay(),
            ttl: settings.ttl(),
            task: None,
            ready: None,
        }
    }

    /// Send `request` after the retry delay; replaces any earlier retry
    pub fn schedule(
        &mut self,
        client: Arc<dyn ChatClient>,
        request: ChatRequest,
        position: Position,
        events: &EventSender,
    ) {
        self.clear();
        let delay = self.delay;
        let events = events.clone();
        self.task = ScheduledTask::spawn(async move {
            tokio::time::sleep(delay).await;
            match client.chat(request).await {
                Ok(response) => {
                    let text = clean_completion_text(&response.content);
                    if text.trim().is_empty() {
                        debug!("Retry at {} returned no text", position);
                        return;
                    }
                    let _ = events.send(SessionEvent::RetryReady(RetrySuggestion {
                        text,
                        position,
                        timestamp: now(),
                    }));
                }
                Err(e) => warn!("Retry request failed: {}", e),
            }
        });
        if self.task.is_some() {
            info!("Retry scheduled at {} in {:?}", position, delay);
        }
    }

    /// Park a delivered retry suggestion
    pub fn deliver(&mut self, suggestion: RetrySuggestion) {
        debug!("Retry suggestion ready at {}", suggestion.position);
        self.task = None;
        self.ready = Some(suggestion);
    }

    /// Consume the parked suggestion if it is for `position` and still fresh
    pub fn take_for(&mut self, position: Position, now: Instant) -> Option<RetrySuggestion> {
        let ready = self.ready.as_ref()?;
        if now.saturating_duration_since(ready.timestamp) >= self.ttl {
            debug!("Retry suggestion at {} expired", ready.position);
            self.ready = None;
            return None;
        }
        if ready.position != position {
            return None;
        }
        self.ready.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn ready(&self) -> Option<&RetrySuggestion> {
        self.ready.as_ref()
    }

    /// Cancel the scheduled retry and drop the parked suggestion
    pub fn clear(&mut self) {
        self.task = None;
        self.ready = None;
    }
}
