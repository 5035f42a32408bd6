//! Text helpers shared by every filter rule
//!
//! All rules see the same word boundaries: a word is a maximal run of letters,
//! digits and underscores, compared case-folded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid word regex"));

/// Case-folded words in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Case-folded words with at least `min_chars` chars
pub fn words_at_least(text: &str, min_chars: usize) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| w.chars().count() >= min_chars)
        .collect()
}

pub fn word_set(text: &str, min_chars: usize) -> BTreeSet<String> {
    words_at_least(text, min_chars).into_iter().collect()
}

/// Jaccard similarity of two word sets; 0 when both are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Identifier chars at the very end of `text`
pub fn trailing_identifier(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map_or(text.len(), |(i, _)| i);
    &text[start..]
}

/// Identifier chars at the very start of `text`
pub fn leading_identifier(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}

/// Last `n` chars of `text`
pub fn last_chars(text: &str, n: usize) -> &str {
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    let skip = count - n;
    let start = text.char_indices().nth(skip).map_or(0, |(i, _)| i);
    &text[start..]
}

/// First `n` chars of `text`
pub fn first_chars(text: &str, n: usize) -> &str {
    let end = text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    &text[..end]
}

/// Longest `k` in `min..=max` such that the last `k` chars of `left` equal
/// the first `k` chars of `right`
pub fn suffix_prefix_overlap(left: &str, right: &str, min: usize, max: usize) -> Option<usize> {
    let limit = max.min(left.chars().count()).min(right.chars().count());
    (min..=limit)
        .rev()
        .find(|&k| last_chars(left, k) == first_chars(right, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_folds_case() {
        assert_eq!(tokenize("let userName = get_user(42);"), vec!["let", "username", "get_user", "42"]);
        assert!(tokenize("  ();").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_ideographs() {
        assert_eq!(tokenize("// 获取 user"), vec!["获取", "user"]);
    }

    #[test]
    fn test_jaccard() {
        let a = word_set("fetch the user list", 3);
        let b = word_set("fetch user", 3);
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_identifier_edges() {
        assert_eq!(trailing_identifier("let total_co"), "total_co");
        assert_eq!(trailing_identifier("foo("), "");
        assert_eq!(leading_identifier("count += 1"), "count");
        assert_eq!(leading_identifier(" x"), "");
    }

    #[test]
    fn test_char_windows_respect_multibyte() {
        assert_eq!(last_chars("héllo wörld", 5), "wörld");
        assert_eq!(first_chars("héllo", 2), "hé");
        assert_eq!(last_chars("ab", 8), "ab");
    }

    #[test]
    fn test_suffix_prefix_overlap() {
        assert_eq!(suffix_prefix_overlap("total = comp", "compute()", 2, 8), Some(4));
        assert_eq!(suffix_prefix_overlap("abc", "xyz", 1, 8), None);
        assert_eq!(suffix_prefix_overlap("aaaa", "aaaa", 4, 8), Some(4));
    }
}
