use crate::host::{DocumentView, ProviderHandle};
use crate::position::{char_len, PositionTracker};
use crate::types::{Position, Range, RegionId, TextEdit};

/// Placeholder text removed from the document and awaiting retyping
#[derive(Debug)]
pub struct GhostRegion {
    pub(crate) id: RegionId,
    pub(crate) original_text: String,
    pub(crate) original_position: Position,
    pub(crate) current_position: Position,
    pub(crate) provider_handle: ProviderHandle,
}

impl GhostRegion {
    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Anchor used to measure retyped text
    pub fn anchor(&self) -> Position {
        self.original_position
    }

    /// Where restore-all puts the text back
    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn provider_handle(&self) -> &ProviderHandle {
        &self.provider_handle
    }

    /// End of the text as if it were laid out at the anchor
    pub fn virtual_end(&self) -> Position {
        PositionTracker::end_of_text(self.original_position, &self.original_text)
    }

    pub(crate) fn track_edit(&mut self, edit: &TextEdit) {
        self.original_position = PositionTracker::adjust(self.original_position, edit);
        self.current_position = PositionTracker::adjust(self.current_position, edit);
    }

    /// Text the user has typed from the anchor up to `position`, if the
    /// position is at or after the anchor
    pub fn typed_until<D: DocumentView + ?Sized>(
        &self,
        document: &D,
        position: Position,
    ) -> Option<String> {
        if position < self.original_position {
            return None;
        }
        // more lines typed than the text has cannot be a prefix
        let span_lines = position.line - self.original_position.line;
        if span_lines > self.original_text.matches('\n').count() as u32 {
            return None;
        }
        Some(document.text_in_range(Range::new(self.original_position, position)))
    }

    /// Untyped remainder when `typed` is a strict prefix of the text
    pub fn remaining_after<'a>(&'a self, typed: &str) -> Option<&'a str> {
        if char_len(typed) >= char_len(&self.original_text) {
            return None;
        }
        self.original_text.strip_prefix(typed)
    }

    /// Fraction of the text already typed, in `[0, 1)`
    pub fn typed_fraction(&self, typed: &str) -> f64 {
        let total = char_len(&self.original_text).max(1) as f64;
        char_len(typed) as f64 / total
    }
}

/// A ghost region relevant at a position
#[derive(Debug, Clone, PartialEq)]
pub struct GhostMatch {
    pub region: RegionId,
    pub anchor: Position,
    /// Untyped remainder of the region text
    pub remaining: String,
    /// Text typed so far
    pub typed: String,
    pub typed_fraction: f64,
    pub same_line: bool,
}
