//! Chat prompts for inline completion
//!
//! The primary prompt is fill-in-the-middle: the text before and after the
//! cursor are sent in marked sections and the model answers with the text to
//! insert. Retry prompts name the rule that rejected the previous answer.

use ghostpad_providers::{ChatRequest, Message};

use crate::config::{RequestSettings, RetrySettings};
use crate::filter::Rejection;
use crate::host::DocumentView;
use crate::types::{Position, Range};

const CURSOR_MARKER: &str = "<CURSOR>";

const PRIMARY_SYSTEM: &str = "You are an inline code completion engine. \
Reply with only the text to insert at <CURSOR>. \
Do not repeat text that is already before or after the cursor. \
Do not add explanations or code fences.";

/// Document text around the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub language_id: String,
    pub prefix: String,
    pub suffix: String,
}

impl PromptContext {
    /// Capture at most `before_chars` chars before and `after_chars` chars
    /// after `position`
    pub fn from_document<D: DocumentView + ?Sized>(
        document: &D,
        position: Position,
        before_chars: usize,
        after_chars: usize,
    ) -> Self {
        let last_line = document.line_count().max(1);
        let doc_start = Position::new(1, 1);
        let doc_end = Position::new(last_line, document.line_end_column(last_line));

        let before = document.text_in_range(Range::new(doc_start, position));
        let after = document.text_in_range(Range::new(position, doc_end));

        let skip = before.chars().count().saturating_sub(before_chars);
        Self {
            language_id: document.language_id().to_string(),
            prefix: before.chars().skip(skip).collect(),
            suffix: after.chars().take(after_chars).collect(),
        }
    }

    fn render(&self) -> String {
        format!(
            "Language: {}\n<PREFIX>{}</PREFIX>{}<SUFFIX>{}</SUFFIX>",
            self.language_id, self.prefix, CURSOR_MARKER, self.suffix
        )
    }
}

/// Builds chat requests for the completion endpoint
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    model: String,
    request: RequestSettings,
    retry: RetrySettings,
}

impl PromptBuilder {
    pub fn new(model: impl Into<String>, request: RequestSettings, retry: RetrySettings) -> Self {
        Self {
            model: model.into(),
            request,
            retry,
        }
    }

    pub fn primary(&self, context: &PromptContext) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(PRIMARY_SYSTEM), Message::user(context.render())],
            temperature: self.request.temperature,
            max_tokens: self.request.max_tokens,
        }
    }

    /// Follow-up request after `rejected` failed the filter with `rejection`
    pub fn retry(&self, context: &PromptContext, rejected: &str, rejection: &Rejection) -> ChatRequest {
        let system = format!(
            "{} Your previous suggestion was rejected by the {} filter: {}. \
Give a different, shorter completion.",
            PRIMARY_SYSTEM, rejection.rule, rejection.reason
        );

        let mut user = context.render();
        user.push_str("\n\nRejected suggestion:\n");
        user.push_str(rejected);
        if !rejection.offending_words.is_empty() {
            user.push_str("\n\nAvoid these words: ");
            user.push_str(&rejection.offending_words.join(", "));
        }

        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: self.request.temperature,
            max_tokens: self.retry.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryEditor;
    use crate::filter::FilterRule;

    fn builder() -> PromptBuilder {
        PromptBuilder::new("coder", RequestSettings::default(), RetrySettings::default())
    }

    #[test]
    fn test_context_windows_are_bounded() {
        let editor = MemoryEditor::new("abcdef\nghijkl", "rust");
        let ctx = PromptContext::from_document(&editor, Position::new(2, 2), 4, 3);
        assert_eq!(ctx.prefix, "ef\ng");
        assert_eq!(ctx.suffix, "hij");
        assert_eq!(ctx.language_id, "rust");
    }

    #[test]
    fn test_primary_request_shape() {
        let editor = MemoryEditor::new("let x = ", "rust");
        let ctx = PromptContext::from_document(&editor, Position::new(1, 9), 100, 100);
        let request = builder().primary(&ctx);

        assert_eq!(request.model, "coder");
        assert_eq!(request.max_tokens, 128);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1]
            .content
            .contains("<PREFIX>let x = </PREFIX><CURSOR><SUFFIX></SUFFIX>"));
    }

    #[test]
    fn test_retry_request_names_rule_and_words() {
        let ctx = PromptContext {
            language_id: "rust".to_string(),
            prefix: "let username = ".to_string(),
            suffix: String::new(),
        };
        let rejection = Rejection {
            rule: FilterRule::SubstringDuplication,
            reason: "words already on the current line: username".to_string(),
            offending_words: vec!["username".to_string()],
        };
        let request = builder().retry(&ctx, "userName", &rejection);

        assert_eq!(request.max_tokens, 48);
        assert!(request.messages[0].content.contains("substring-duplication"));
        assert!(request.messages[1].content.contains("Avoid these words: username"));
        assert!(request.messages[1].content.contains("userName"));
    }
}
