//! Quality and anti-repetition filter for AI suggestions
//!
//! Rules run in a fixed order and the first violation rejects the
//! suggestion. A rejection names the rule, a readable reason and the words
//! the retry prompt should steer the model away from.

pub mod context;
pub mod text;

pub use context::SuggestionContext;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use text::{
    first_chars, jaccard, last_chars, leading_identifier, suffix_prefix_overlap, tokenize,
    trailing_identifier, word_set, words_at_least,
};

/// Minimum word length for substring duplication checks
const MIN_WORD_CHARS: usize = 3;
/// Window compared on each side of the cursor for prefix overlap
const OVERLAP_WINDOW: usize = 8;
const MIN_PREFIX_OVERLAP: usize = 4;
const MIN_BOUNDARY_OVERLAP: usize = 2;
const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Overlaps that are ordinary code rather than repetition
const ALLOWED_IDIOMS: &[&str] = &[
    "const", "function", "return", "let", "var", "import", "export", "class", "this.", "self.",
    ".", "=>", "()",
];

const COMMENT_KEYWORDS: &[&str] = &[
    "todo",
    "fixme",
    "note",
    "hack",
    "xxx",
    "bug",
    "warning",
    "deprecated",
];

/// Filter rules in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterRule {
    CommentDuplication,
    SubstringDuplication,
    PrefixOverlap,
    SuffixDuplication,
    WordBoundary,
    SemanticSimilarity,
    QualityFloor,
}

impl FilterRule {
    pub const ALL: [FilterRule; 7] = [
        FilterRule::CommentDuplication,
        FilterRule::SubstringDuplication,
        FilterRule::PrefixOverlap,
        FilterRule::SuffixDuplication,
        FilterRule::WordBoundary,
        FilterRule::SemanticSimilarity,
        FilterRule::QualityFloor,
    ];

    /// Stable identifier used in logs and retry prompts
    pub fn id(&self) -> &'static str {
        match self {
            FilterRule::CommentDuplication => "comment-duplication",
            FilterRule::SubstringDuplication => "substring-duplication",
            FilterRule::PrefixOverlap => "prefix-overlap",
            FilterRule::SuffixDuplication => "suffix-duplication",
            FilterRule::WordBoundary => "word-boundary",
            FilterRule::SemanticSimilarity => "semantic-similarity",
            FilterRule::QualityFloor => "quality-floor",
        }
    }

    /// Check one suggestion; `None` means the rule passes
    pub fn check(&self, suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
        match self {
            FilterRule::CommentDuplication => check_comment_duplication(suggestion, ctx),
            FilterRule::SubstringDuplication => check_substring_duplication(suggestion, ctx),
            FilterRule::PrefixOverlap => check_prefix_overlap(suggestion, ctx),
            FilterRule::SuffixDuplication => check_suffix_duplication(suggestion, ctx),
            FilterRule::WordBoundary => check_word_boundary(suggestion, ctx),
            FilterRule::SemanticSimilarity => check_semantic_similarity(suggestion, ctx),
            FilterRule::QualityFloor => check_quality_floor(suggestion),
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why a suggestion was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub rule: FilterRule,
    pub reason: String,
    pub offending_words: Vec<String>,
}

impl Rejection {
    fn new(rule: FilterRule, reason: impl Into<String>, offending_words: Vec<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
            offending_words,
        }
    }
}

/// Ordered rule chain
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionFilterPipeline;

impl CompletionFilterPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule in order; the first violation wins
    pub fn evaluate(&self, suggestion: &str, ctx: &SuggestionContext) -> Result<(), Rejection> {
        for rule in FilterRule::ALL {
            if let Some(rejection) = rule.check(suggestion, ctx) {
                debug!(
                    "Suggestion rejected by {}: {}",
                    rejection.rule, rejection.reason
                );
                return Err(rejection);
            }
        }
        Ok(())
    }
}

fn check_comment_duplication(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    if !ctx.is_comment_line {
        return None;
    }
    if ctx.current_line.trim().is_empty() && ctx.before_cursor.trim().is_empty() {
        return None;
    }
    let syntax = ctx.comment_syntax();
    if !syntax.contains_comment_token(suggestion) {
        return None;
    }
    let tokens: Vec<String> = syntax
        .tokens()
        .into_iter()
        .filter(|t| *t != "*" && suggestion.contains(t))
        .map(str::to_string)
        .collect();
    Some(Rejection::new(
        FilterRule::CommentDuplication,
        "suggestion repeats comment markers on a line that is already a comment",
        tokens,
    ))
}

fn check_substring_duplication(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    let line_words = words_at_least(&ctx.current_line, MIN_WORD_CHARS);
    if line_words.is_empty() {
        return None;
    }
    let offending: Vec<String> = words_at_least(suggestion, MIN_WORD_CHARS)
        .into_iter()
        .filter(|word| {
            line_words
                .iter()
                .any(|existing| existing.contains(word.as_str()) || word.contains(existing.as_str()))
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if offending.is_empty() {
        return None;
    }
    Some(Rejection::new(
        FilterRule::SubstringDuplication,
        format!(
            "words already on the current line: {}",
            offending.join(", ")
        ),
        offending,
    ))
}

fn check_prefix_overlap(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    let tail = last_chars(&ctx.before_cursor, OVERLAP_WINDOW);
    let head = first_chars(suggestion, OVERLAP_WINDOW);
    let length = suffix_prefix_overlap(tail, head, MIN_PREFIX_OVERLAP, OVERLAP_WINDOW)?;
    let overlap = last_chars(tail, length);
    if is_allowed_idiom(overlap) {
        return None;
    }
    Some(Rejection::new(
        FilterRule::PrefixOverlap,
        format!("suggestion starts by repeating \"{}\" before the cursor", overlap),
        vec![overlap.trim().to_string()],
    ))
}

fn is_allowed_idiom(overlap: &str) -> bool {
    let trimmed = overlap.trim();
    trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.ends_with('.')
        || ALLOWED_IDIOMS.iter().any(|idiom| *idiom == trimmed)
}

fn check_suffix_duplication(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    let after = ctx.after_cursor.trim();
    let trimmed = suggestion.trim();
    if after.is_empty() || trimmed.is_empty() {
        return None;
    }

    let after_words = word_set(after, 1);
    let shared: Vec<String> = word_set(trimmed, 1)
        .intersection(&after_words)
        .cloned()
        .collect();
    if !shared.is_empty() {
        return Some(Rejection::new(
            FilterRule::SuffixDuplication,
            format!("words already after the cursor: {}", shared.join(", ")),
            shared,
        ));
    }

    if after.contains(trimmed) || trimmed.contains(after) {
        return Some(Rejection::new(
            FilterRule::SuffixDuplication,
            "suggestion duplicates the text after the cursor",
            vec![after.to_string()],
        ));
    }
    None
}

fn check_word_boundary(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    let last = trailing_identifier(&ctx.before_cursor).to_lowercase();
    let first = leading_identifier(suggestion).to_lowercase();
    if last.is_empty() || first.is_empty() {
        return None;
    }

    let duplicated = last.contains(first.as_str())
        || first.contains(last.as_str())
        || suffix_prefix_overlap(&last, &first, MIN_BOUNDARY_OVERLAP, usize::MAX).is_some();
    if !duplicated {
        return None;
    }
    Some(Rejection::new(
        FilterRule::WordBoundary,
        format!(
            "first word \"{}\" overlaps the word \"{}\" before the cursor",
            first, last
        ),
        vec![first],
    ))
}

fn check_semantic_similarity(suggestion: &str, ctx: &SuggestionContext) -> Option<Rejection> {
    if !ctx.is_comment_line || suggestion.chars().count() <= 3 {
        return None;
    }

    let line_words = word_set(&ctx.current_line, MIN_WORD_CHARS);
    let suggestion_words = word_set(suggestion, MIN_WORD_CHARS);
    let similarity = jaccard(&line_words, &suggestion_words);
    if similarity > SIMILARITY_THRESHOLD {
        let shared: Vec<String> = line_words
            .intersection(&suggestion_words)
            .cloned()
            .collect();
        return Some(Rejection::new(
            FilterRule::SemanticSimilarity,
            format!(
                "comment restates the current line (similarity {:.2})",
                similarity
            ),
            shared,
        ));
    }

    let syntax = ctx.comment_syntax();
    let line_tokens: BTreeSet<String> =
        tokenize(&syntax.strip_tokens(&ctx.current_line)).into_iter().collect();
    let suggestion_tokens: BTreeSet<String> =
        tokenize(&syntax.strip_tokens(suggestion)).into_iter().collect();
    let keywords: Vec<String> = COMMENT_KEYWORDS
        .iter()
        .filter(|k| line_tokens.contains(**k) && suggestion_tokens.contains(**k))
        .map(|k| k.to_string())
        .collect();
    if keywords.is_empty() {
        return None;
    }
    Some(Rejection::new(
        FilterRule::SemanticSimilarity,
        format!("comment repeats the keyword {}", keywords.join(", ")),
        keywords,
    ))
}

fn check_quality_floor(suggestion: &str) -> Option<Rejection> {
    if suggestion.trim().is_empty() {
        return Some(Rejection::new(
            FilterRule::QualityFloor,
            "suggestion is empty",
            Vec::new(),
        ));
    }
    if !suggestion.chars().any(char::is_alphanumeric) {
        return Some(Rejection::new(
            FilterRule::QualityFloor,
            "suggestion has no letters or digits",
            Vec::new(),
        ));
    }
    let distinct: BTreeSet<char> = suggestion.chars().filter(|c| !c.is_whitespace()).collect();
    if suggestion.chars().count() > 5 && distinct.len() <= 2 {
        return Some(Rejection::new(
            FilterRule::QualityFloor,
            "suggestion is a repeated character run",
            Vec::new(),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn ctx(line: &str, column: u32) -> SuggestionContext {
        SuggestionContext::new(line, column, Language::Rust)
    }

    fn rule_for(suggestion: &str, ctx: &SuggestionContext) -> Option<FilterRule> {
        CompletionFilterPipeline::new()
            .evaluate(suggestion, ctx)
            .err()
            .map(|r| r.rule)
    }

    #[test]
    fn test_accepts_plain_continuation() {
        let c = ctx("let total = ", 13);
        assert_eq!(rule_for("items.len();", &c), None);
    }

    #[test]
    fn test_comment_line_rejects_comment_tokens() {
        let c = ctx("    // compute the sum", 23);
        let rejection = CompletionFilterPipeline::new()
            .evaluate(" // of all items", &c)
            .unwrap_err();
        assert_eq!(rejection.rule, FilterRule::CommentDuplication);
        assert_eq!(rejection.offending_words, vec!["//"]);
    }

    #[test]
    fn test_comment_tokens_fine_on_code_line() {
        let c = ctx("let x = 1;", 11);
        assert_ne!(rule_for(" // one", &c), Some(FilterRule::CommentDuplication));
    }

    #[test]
    fn test_substring_duplication_is_case_folded() {
        let c = ctx("let username = ", 16);
        let rejection = CompletionFilterPipeline::new()
            .evaluate("userName.trim()", &c)
            .unwrap_err();
        assert_eq!(rejection.rule, FilterRule::SubstringDuplication);
        assert_eq!(rejection.offending_words, vec!["username"]);
    }

    #[test]
    fn test_substring_matches_containment_both_ways() {
        let c = ctx("let user = ", 12);
        assert_eq!(rule_for("users[0]", &c), Some(FilterRule::SubstringDuplication));
    }

    #[test]
    fn test_prefix_overlap_rejected() {
        // the model repeats " + b" already before the cursor
        let rejection = CompletionFilterPipeline::new()
            .evaluate(" + b * 2", &ctx("v = a + b", 10))
            .unwrap_err();
        assert_eq!(rejection.rule, FilterRule::PrefixOverlap);
        assert_eq!(rejection.offending_words, vec!["+ b"]);
    }

    #[test]
    fn test_prefix_overlap_allows_idioms() {
        assert!(is_allowed_idiom("return"));
        assert!(is_allowed_idiom(" const"));
        assert!(is_allowed_idiom("obj."));
        assert!(is_allowed_idiom("    "));
        assert!(!is_allowed_idiom("= fo"));
    }

    #[test]
    fn test_suffix_duplication() {
        let c = ctx("f(); ok", 2);
        assert_eq!(rule_for("(); ok", &c), Some(FilterRule::SuffixDuplication));
        let c = ctx("x = ;", 5);
        assert_eq!(rule_for(";", &c), Some(FilterRule::SuffixDuplication));
    }

    #[test]
    fn test_word_boundary_overlap() {
        let c = ctx("x = ab", 7);
        assert_eq!(rule_for("abc + 1", &c), Some(FilterRule::WordBoundary));
        // "ab" overlaps the start of "bcd" by one char only
        let c = ctx("ab", 3);
        assert_eq!(rule_for("bcd", &c), None);
        let c = ctx("fooba", 6);
        assert_eq!(rule_for("bar()", &c), Some(FilterRule::WordBoundary));
    }

    #[test]
    fn test_semantic_similarity_on_comment_line() {
        let c = ctx("// load config from disk", 25);
        let rejection = FilterRule::SemanticSimilarity
            .check(" and parse config from disk", &c)
            .unwrap();
        assert_eq!(rejection.offending_words, vec!["config", "disk", "from"]);
    }

    #[test]
    fn test_shared_comment_keyword() {
        let c = ctx("// TODO handle errors", 22);
        let rejection = FilterRule::SemanticSimilarity
            .check(" later, todo", &c)
            .unwrap();
        assert_eq!(rejection.offending_words, vec!["todo"]);
    }

    #[test]
    fn test_quality_floor() {
        let c = ctx("", 1);
        assert_eq!(rule_for("   ", &c), Some(FilterRule::QualityFloor));
        assert_eq!(rule_for("();", &c), Some(FilterRule::QualityFloor));
        assert_eq!(rule_for("aaaaaaa", &c), Some(FilterRule::QualityFloor));
        assert_eq!(rule_for("ok", &c), None);
    }

    #[test]
    fn test_semantic_similarity_ignores_code_lines() {
        let c = ctx("load config from disk", 22);
        assert!(FilterRule::SemanticSimilarity
            .check(" config from disk", &c)
            .is_none());
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let ids: BTreeSet<&str> = FilterRule::ALL.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), FilterRule::ALL.len());
    }
}
