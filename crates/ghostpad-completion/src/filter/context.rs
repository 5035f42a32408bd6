use crate::host::DocumentView;
use crate::language::{CommentSyntax, Language};
use crate::types::Position;

/// The line around the cursor as the filter rules see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    pub current_line: String,
    pub before_cursor: String,
    pub after_cursor: String,
    pub is_comment_line: bool,
    pub language: Language,
}

impl SuggestionContext {
    pub fn new(current_line: &str, column: u32, language: Language) -> Self {
        let split = (column.max(1) - 1) as usize;
        let before_cursor: String = current_line.chars().take(split).collect();
        let after_cursor: String = current_line.chars().skip(split).collect();
        Self {
            is_comment_line: language.comment_syntax().is_comment_line(current_line),
            current_line: current_line.to_string(),
            before_cursor,
            after_cursor,
            language,
        }
    }

    /// Context at `position` in a document
    pub fn from_document<D: DocumentView + ?Sized>(document: &D, position: Position) -> Self {
        let line = document.line_content(position.line).unwrap_or_default();
        Self::new(
            &line,
            position.column,
            Language::from_language_id(document.language_id()),
        )
    }

    pub fn comment_syntax(&self) -> CommentSyntax {
        self.language.comment_syntax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryEditor;

    #[test]
    fn test_splits_at_cursor() {
        let ctx = SuggestionContext::new("let x = 1;", 5, Language::Rust);
        assert_eq!(ctx.before_cursor, "let ");
        assert_eq!(ctx.after_cursor, "x = 1;");
        assert!(!ctx.is_comment_line);
    }

    #[test]
    fn test_from_document_detects_comment() {
        let editor = MemoryEditor::new("fn main() {}\n    # note", "python");
        let ctx = SuggestionContext::from_document(&editor, Position::new(2, 11));
        assert!(ctx.is_comment_line);
        assert_eq!(ctx.before_cursor, "    # note");
        assert_eq!(ctx.after_cursor, "");
    }

    #[test]
    fn test_unknown_line_is_empty() {
        let editor = MemoryEditor::new("", "rust");
        let ctx = SuggestionContext::from_document(&editor, Position::new(7, 3));
        assert_eq!(ctx.current_line, "");
        assert_eq!(ctx.before_cursor, "");
    }
}
