//! Timers that post events back to the session
//!
//! Timers never touch session state. When one fires it sends a
//! [`SessionEvent`] on the session channel; the host drains the channel and
//! hands each event to `EditorSession::handle_event` on its own thread.

use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::retry::RetrySuggestion;

/// Deferred work for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Placeholderize the queued selections
    FlushPlaceholders,
    /// Ask the host to query inline suggestions again
    RefreshSuggestions,
    /// A retry completed after a rejection
    RetryReady(RetrySuggestion),
}

pub type EventSender = UnboundedSender<SessionEvent>;
pub type EventReceiver = UnboundedReceiver<SessionEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A spawned timer task, aborted when dropped
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Post `event` after `delay`
    ///
    /// Without a tokio runtime the event is delivered immediately and `None`
    /// is returned.
    pub fn after(delay: Duration, events: &EventSender, event: SessionEvent) -> Option<Self> {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime, delivering {:?} immediately", event);
            let _ = events.send(event);
            return None;
        };
        let events = events.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        Some(Self { handle })
    }

    /// Run a future on the current runtime, if there is one
    pub fn spawn<F>(future: F) -> Option<Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(runtime) => Some(Self {
                handle: runtime.spawn(future),
            }),
            Err(_) => {
                debug!("No async runtime, background task skipped");
                None
            }
        }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Restartable single-shot timer
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    task: Option<ScheduledTask>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, task: None }
    }

    /// (Re)start the timer; any earlier pending firing is cancelled
    pub fn trigger(&mut self, events: &EventSender, event: SessionEvent) {
        self.task = ScheduledTask::after(self.delay, events, event);
    }

    pub fn cancel(&mut self) {
        self.task = None;
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}
