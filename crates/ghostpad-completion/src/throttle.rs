//! Completion request budget
//!
//! At most `max_requests` permits are granted per window. The window opens on
//! the first permit and closes `window` later; activity after an idle gap
//! longer than the window starts over with a full quota.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::ThrottleSettings;

/// Snapshot of the budget counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBudget {
    pub count: u32,
    pub window_start: Option<Instant>,
    pub last_request: Option<Instant>,
}

/// Fixed-window request throttler
#[derive(Debug, Clone)]
pub struct CompletionRequestThrottler {
    max_requests: u32,
    window: Duration,
    count: u32,
    window_start: Option<Instant>,
    last_request: Option<Instant>,
    /// When `count` returns to zero
    reset_at: Option<Instant>,
}

impl CompletionRequestThrottler {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            count: 0,
            window_start: None,
            last_request: None,
            reset_at: None,
        }
    }

    pub fn from_settings(settings: &ThrottleSettings) -> Self {
        Self::new(settings.max_requests, settings.window())
    }

    /// Try to take a permit now
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Try to take a permit at `now`
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.expire(now);

        if self.count >= self.max_requests {
            debug!(
                "Completion request throttled ({}/{} in window)",
                self.count, self.max_requests
            );
            return false;
        }

        if self.count == 0 {
            self.window_start = Some(now);
        }
        self.count += 1;
        self.last_request = Some(now);

        let start = self.window_start.unwrap_or(now);
        let remaining = self.window.saturating_sub(now.saturating_duration_since(start));
        self.reset_at = Some(now + remaining);
        true
    }

    /// Permits left in the current window at `now`
    pub fn remaining_at(&mut self, now: Instant) -> u32 {
        self.expire(now);
        self.max_requests.saturating_sub(self.count)
    }

    pub fn budget(&self) -> RequestBudget {
        RequestBudget {
            count: self.count,
            window_start: self.window_start,
            last_request: self.last_request,
        }
    }

    /// Clear all counters
    pub fn reset(&mut self) {
        self.count = 0;
        self.window_start = None;
        self.reset_at = None;
    }

    fn expire(&mut self, now: Instant) {
        if self.count == 0 {
            return;
        }
        let idle = self
            .last_request
            .is_some_and(|last| now.saturating_duration_since(last) > self.window);
        let deadline_passed = self.reset_at.is_some_and(|at| now >= at);
        if idle || deadline_passed {
            debug!("Request window reset after {} requests", self.count);
            self.reset();
        }
    }
}

impl Default for CompletionRequestThrottler {
    fn default() -> Self {
        Self::from_settings(&ThrottleSettings::default())
    }
}
