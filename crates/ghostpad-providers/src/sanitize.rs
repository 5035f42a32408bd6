//! Cleanup applied to raw model output before it reaches the filter pipeline

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+.#-]*\s*$").expect("valid fence regex"));

/// Strip fenced code-block delimiters and carriage returns.
///
/// Fence lines are dropped entirely; inline triple backticks are removed.
/// Leading and trailing newlines left behind by the fences are trimmed, but
/// leading spaces on the first line are preserved since they may be
/// meaningful at the cursor.
pub fn clean_completion_text(raw: &str) -> String {
    let without_cr = raw.replace('\r', "");
    let kept: Vec<&str> = without_cr
        .split('\n')
        .filter(|line| !FENCE_LINE.is_match(line))
        .collect();
    let joined = kept.join("\n").replace("```", "");
    joined.trim_matches('\n').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences() {
        let raw = "```rust\nlet x = 1;\n```";
        assert_eq!(clean_completion_text(raw), "let x = 1;");
    }

    #[test]
    fn test_strips_carriage_returns() {
        assert_eq!(clean_completion_text("a\r\nb\r\n"), "a\nb");
    }

    #[test]
    fn test_keeps_leading_space() {
        assert_eq!(clean_completion_text(" world"), " world");
    }

    #[test]
    fn test_inline_backticks_removed() {
        assert_eq!(clean_completion_text("```foo()```"), "foo()");
    }

    #[test]
    fn test_only_fences_is_empty() {
        assert_eq!(clean_completion_text("```\n```"), "");
    }
}
