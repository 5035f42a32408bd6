//! Interfaces to the host editor widget
//!
//! The host owns the document model, rendering and keystroke dispatch. The
//! completion subsystem only reads line/column addressed text, applies
//! programmatic edits and registers inline-completion providers.
//!
//! Edits applied through [`EditorHost::apply_edits`] are not echoed back to
//! the session; the session tracks its own edits. Edits made by the user are
//! reported through `EditorSession::on_content_changed`.

use crate::types::{Notice, Position, ProviderId, Range, TextEdit};
use tracing::debug;

/// Read-only view of the document
pub trait DocumentView {
    /// Number of lines (at least 1)
    fn line_count(&self) -> u32;

    /// Content of a 1-based line without its line break
    fn line_content(&self, line: u32) -> Option<String>;

    /// Text between two positions
    fn text_in_range(&self, range: Range) -> String;

    /// Monotonic revision id, bumped on every change
    fn version_id(&self) -> u64;

    /// Language id of the document, e.g. `"rust"`
    fn language_id(&self) -> &str;

    /// Column just past the last char of `line`
    fn line_end_column(&self, line: u32) -> u32 {
        self.line_content(line)
            .map(|l| l.chars().count() as u32 + 1)
            .unwrap_or(1)
    }
}

/// Mutable access to the host editor
pub trait EditorHost: DocumentView {
    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, position: Position);

    /// Apply edits as one batch; every range refers to the pre-batch document
    fn apply_edits(&mut self, edits: &[TextEdit]);

    /// Register an inline-completion provider scoped to a language
    fn register_inline_provider(&mut self, language_id: &str) -> ProviderId;

    fn dispose_inline_provider(&mut self, id: ProviderId);

    /// Ask the widget to query inline suggestions again
    fn trigger_inline_suggest(&mut self) {}

    /// Show a transient notification
    fn notify(&mut self, _notice: Notice) {}
}

/// A provider registration released exactly once
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderHandle {
    id: ProviderId,
    released: bool,
}

impl ProviderHandle {
    pub fn register<H: EditorHost + ?Sized>(host: &mut H, language_id: &str) -> Self {
        let id = host.register_inline_provider(language_id);
        debug!("Registered inline provider {:?} for language {}", id, language_id);
        Self {
            id,
            released: false,
        }
    }

    pub fn id(&self) -> ProviderId {
        self.id
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Dispose the registration; returns false if it was already released
    pub fn release<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        host.dispose_inline_provider(self.id);
        debug!("Disposed inline provider {:?}", self.id);
        true
    }
}
