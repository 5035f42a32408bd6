//! Position tracking across document edits
//!
//! Ghost-region anchors are reference points for comparing what the user
//! retypes against the region's text. An anchor only moves for edits that end
//! at or before it; an edit that starts at the anchor (the user typing into the
//! region) or overlaps it leaves the anchor where it is.

use crate::types::{Position, TextEdit};

/// Stateless position-adjustment functions
pub struct PositionTracker;

impl PositionTracker {
    /// Adjust an anchored position for one edit
    pub fn adjust(position: Position, edit: &TextEdit) -> Position {
        let range = edit.range;
        if range.start >= position || range.end > position {
            return position;
        }

        let lines_removed = range.end.line - range.start.line;
        let lines_inserted = count_newlines(&edit.text);
        let line = position.line + lines_inserted - lines_removed;

        if range.end.line != position.line {
            return Position::new(line, position.column);
        }

        // The tail of the anchor's line after the edit is re-based onto the
        // end of the inserted text.
        let inserted_end = Self::end_of_text(range.start, &edit.text);
        let offset_in_tail = position.column - range.end.column;
        Position::new(line, inserted_end.column + offset_in_tail)
    }

    /// Apply a sequence of edits in host order
    pub fn adjust_all<'a>(
        position: Position,
        edits: impl IntoIterator<Item = &'a TextEdit>,
    ) -> Position {
        edits
            .into_iter()
            .fold(position, |pos, edit| Self::adjust(pos, edit))
    }

    /// Position just past `text` if it were laid out starting at `start`
    pub fn end_of_text(start: Position, text: &str) -> Position {
        match text.rfind('\n') {
            None => Position::new(start.line, start.column + char_len(text)),
            Some(idx) => Position::new(
                start.line + count_newlines(text),
                1 + char_len(&text[idx + 1..]),
            ),
        }
    }
}

pub(crate) fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|b| *b == b'\n').count() as u32
}

pub(crate) fn char_len(text: &str) -> u32 {
    text.chars().count() as u32
}
