//! Core value types shared by the ghost-region and completion modules

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A document position. Both fields are 1-based; columns count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)` in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, swapping the endpoints if they are reversed
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Zero-width range at a position
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `position` lies strictly between start and end
    pub fn strictly_contains(&self, position: Position) -> bool {
        self.start < position && position < self.end
    }
}

/// A single replacement of `range` by `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub text: String,
}

impl TextEdit {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::new(Range::empty(at), text)
    }

    pub fn delete(range: Range) -> Self {
        Self::new(range, String::new())
    }
}

/// A user selection about to be turned into a ghost region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub range: Range,
    pub text: String,
}

impl Selection {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Opaque ghost-region identifier, unique for a store's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub(crate) u64);

impl RegionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ghost-{}", self.0)
    }
}

/// Host-issued completion-provider registration token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub u64);

/// Where an inline suggestion came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionSource {
    /// Remaining text of a ghost region
    Ghost { region: RegionId, provider: ProviderId },
    /// Model output that passed the filter pipeline
    Ai,
    /// Retry output, delivered without re-filtering
    Retry,
}

/// Extra data attached to an inline completion item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionMetadata {
    pub source: SuggestionSource,
    /// Document version the suggestion was computed against
    pub version: u64,
}

/// One inline completion offered to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCompletionItem {
    pub insert_text: String,
    /// Always zero-width at the request position
    pub range: Range,
    pub metadata: Option<SuggestionMetadata>,
}

/// Response to a completion-provider request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCompletions {
    pub items: Vec<InlineCompletionItem>,
}

impl InlineCompletions {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(item: InlineCompletionItem) -> Self {
        Self { items: vec![item] }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Transient, non-blocking notifications shown by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Accept-line requested with no ghost region at the cursor
    NothingToAccept,
    /// The current line of the ghost text is already typed
    LineAlreadyComplete,
    /// Restore-all put back this many regions
    RegionsRestored(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 5) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 10));
        assert_eq!(Position::new(4, 4).cmp(&Position::new(4, 4)), Ordering::Equal);
    }

    #[test]
    fn test_range_normalizes() {
        let range = Range::new(Position::new(2, 1), Position::new(1, 3));
        assert_eq!(range.start, Position::new(1, 3));
        assert_eq!(range.end, Position::new(2, 1));
    }

    #[test]
    fn test_strictly_contains() {
        let range = Range::new(Position::new(1, 1), Position::new(1, 5));
        assert!(range.strictly_contains(Position::new(1, 3)));
        assert!(!range.strictly_contains(Position::new(1, 1)));
        assert!(!range.strictly_contains(Position::new(1, 5)));
    }
}
