/// Pending suggestion state for acceptance commands
///
/// The last suggestion offered to the host is kept as the accept target,
/// bound to the cursor position and document version it was computed for.
/// An acceptance command is only honoured while both still match.
use crate::types::{Position, SuggestionSource};
use tracing::debug;

/// A suggestion the user can accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSuggestion {
    pub text: String,
    pub position: Position,
    pub version: u64,
    pub source: SuggestionSource,
}

/// Acceptance command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptMode {
    /// Tab: accept the whole suggestion
    Full,
    /// Right arrow: accept the next whitespace-delimited token
    NextToken,
    /// End: accept the whole suggestion and move to the end of the line
    FullToLineEnd,
}

/// Text an acceptance command inserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub inserted: String,
    /// Untyped remainder after a partial acceptance
    pub rest: String,
    pub mode: AcceptMode,
    pub source: SuggestionSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AcceptanceState {
    #[default]
    Dismissed,
    Pending(PendingSuggestion),
}

/// Holds at most one pending suggestion
#[derive(Debug, Default)]
pub struct PendingAcceptance {
    state: AcceptanceState,
}

impl PendingAcceptance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, suggestion: PendingSuggestion) {
        self.state = AcceptanceState::Pending(suggestion);
    }

    pub fn dismiss(&mut self) {
        self.state = AcceptanceState::Dismissed;
    }

    pub fn state(&self) -> &AcceptanceState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingSuggestion> {
        match &self.state {
            AcceptanceState::Pending(p) => Some(p),
            AcceptanceState::Dismissed => None,
        }
    }

    /// Take the text for `mode` if the pending suggestion matches `cursor` and
    /// `version`; a stale suggestion is dropped
    pub fn accept(&mut self, mode: AcceptMode, cursor: Position, version: u64) -> Option<Acceptance> {
        let pending = match std::mem::take(&mut self.state) {
            AcceptanceState::Pending(p) => p,
            AcceptanceState::Dismissed => return None,
        };
        if pending.position != cursor || pending.version != version {
            debug!(
                "Dropping stale suggestion for {} (cursor {}, version {} vs {})",
                pending.position, cursor, pending.version, version
            );
            return None;
        }

        let (inserted, rest) = match mode {
            AcceptMode::Full | AcceptMode::FullToLineEnd => (pending.text, String::new()),
            AcceptMode::NextToken => {
                let (token, rest) = split_next_token(&pending.text);
                (token.to_string(), rest.to_string())
            }
        };
        Some(Acceptance {
            inserted,
            rest,
            mode,
            source: pending.source,
        })
    }
}

/// Leading whitespace plus the following run of non-whitespace
pub fn split_next_token(text: &str) -> (&str, &str) {
    let word_start = text
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| i);
    let word_end = text[word_start..]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map_or(text.len(), |(i, _)| word_start + i);
    text.split_at(word_end)
}
