/// Language identification and comment syntax
///
/// The host reports a language id per document (`"rust"`, `"typescript"`,
/// ...). Comment detection in the filter pipeline keys off that id, falling
/// back to the union of common comment tokens for unknown languages.
use serde::{Deserialize, Serialize};

/// Languages with known comment syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    /// TypeScript and JavaScript
    TypeScript,
    Python,
    Go,
    Java,
    Kotlin,
    Dart,
    /// C, C++ and C#
    CFamily,
    /// Shell, YAML, TOML and similar hash-comment formats
    Shell,
    Sql,
    Lua,
    /// HTML, XML and Markdown
    Markup,
    Css,
    /// Unknown or unsupported language
    Unknown,
}

/// Comment tokens of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub line: &'static [&'static str],
    pub block: &'static [(&'static str, &'static str)],
}

const SLASH: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: &[("/*", "*/")],
};

const GENERIC: CommentSyntax = CommentSyntax {
    line: &["//", "#", "--", ";"],
    block: &[("/*", "*/"), ("<!--", "-->"), ("\"\"\"", "\"\"\"")],
};

impl Language {
    /// Map a host language id to a language
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(Language::from_language_id("javascriptreact"), Language::TypeScript);
    /// ```
    pub fn from_language_id(id: &str) -> Self {
        match id.to_lowercase().as_str() {
            "rust" => Language::Rust,
            "typescript" | "typescriptreact" | "javascript" | "javascriptreact" | "vue" => {
                Language::TypeScript
            }
            "python" => Language::Python,
            "go" => Language::Go,
            "java" => Language::Java,
            "kotlin" => Language::Kotlin,
            "dart" => Language::Dart,
            "c" | "cpp" | "csharp" | "objective-c" => Language::CFamily,
            "shell" | "bash" | "sh" | "powershell" | "yaml" | "toml" | "ruby" | "perl" | "r"
            | "dockerfile" | "makefile" | "ini" => Language::Shell,
            "sql" | "mysql" | "pgsql" => Language::Sql,
            "lua" => Language::Lua,
            "html" | "xml" | "markdown" | "svg" => Language::Markup,
            "css" | "scss" | "less" => Language::Css,
            _ => Language::Unknown,
        }
    }

    /// Comment tokens recognised for this language
    pub fn comment_syntax(&self) -> CommentSyntax {
        match self {
            Language::Rust
            | Language::TypeScript
            | Language::Go
            | Language::Java
            | Language::Kotlin
            | Language::Dart
            | Language::CFamily => SLASH,
            Language::Python => CommentSyntax {
                line: &["#"],
                block: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
            },
            Language::Shell => CommentSyntax {
                line: &["#"],
                block: &[],
            },
            Language::Sql => CommentSyntax {
                line: &["--"],
                block: &[("/*", "*/")],
            },
            Language::Lua => CommentSyntax {
                line: &["--"],
                block: &[("--[[", "]]")],
            },
            Language::Markup => CommentSyntax {
                line: &[],
                block: &[("<!--", "-->")],
            },
            Language::Css => CommentSyntax {
                line: &[],
                block: &[("/*", "*/")],
            },
            Language::Unknown => GENERIC,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Dart => "dart",
            Language::CFamily => "c",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::Lua => "lua",
            Language::Markup => "markup",
            Language::Css => "css",
            Language::Unknown => "unknown",
        }
    }
}

impl CommentSyntax {
    /// Every opening and closing token, longest first
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<&'static str> = self.line.to_vec();
        for &(open, close) in self.block {
            tokens.push(open);
            tokens.push(close);
        }
        // continuation lines of block comments
        if self.block.iter().any(|(open, _)| *open == "/*") {
            tokens.push("*");
        }
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        tokens.dedup();
        tokens
    }

    /// Whether a trimmed line opens or continues a comment
    pub fn is_comment_line(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return false;
        }
        self.line.iter().any(|t| trimmed.starts_with(t))
            || self.block.iter().any(|(open, _)| trimmed.starts_with(open))
            || (self.block.iter().any(|(open, _)| *open == "/*") && trimmed.starts_with('*'))
    }

    /// Whether the text contains an opening or closing comment token
    pub fn contains_comment_token(&self, text: &str) -> bool {
        self.line.iter().any(|t| text.contains(t))
            || self
                .block
                .iter()
                .any(|(open, close)| text.contains(open) || text.contains(close))
    }

    /// Remove every comment token from the text
    pub fn strip_tokens(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for token in self.tokens() {
            stripped = stripped.replace(token, " ");
        }
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_id() {
        assert_eq!(Language::from_language_id("rust"), Language::Rust);
        assert_eq!(Language::from_language_id("javascript"), Language::TypeScript);
        assert_eq!(Language::from_language_id("Python"), Language::Python);
        assert_eq!(Language::from_language_id("cpp"), Language::CFamily);
        assert_eq!(Language::from_language_id("yaml"), Language::Shell);
        assert_eq!(Language::from_language_id("cobol"), Language::Unknown);
    }

    #[test]
    fn test_comment_line_detection() {
        let rust = Language::Rust.comment_syntax();
        assert!(rust.is_comment_line("    // hello"));
        assert!(rust.is_comment_line(" * continued"));
        assert!(!rust.is_comment_line("let x = 1; // trailing"));
        assert!(!rust.is_comment_line("   "));

        let python = Language::Python.comment_syntax();
        assert!(python.is_comment_line("# note"));
        assert!(!python.is_comment_line("// not python"));
    }

    #[test]
    fn test_generic_syntax_covers_common_tokens() {
        let generic = Language::Unknown.comment_syntax();
        assert!(generic.is_comment_line("-- sql"));
        assert!(generic.is_comment_line("<!-- html -->"));
        assert!(generic.contains_comment_token("foo */"));
    }

    #[test]
    fn test_strip_tokens() {
        let rust = Language::Rust.comment_syntax();
        assert_eq!(rust.strip_tokens("// TODO fix").trim(), "TODO fix");
    }

    #[test]
    fn test_tokens_longest_first() {
        let tokens = Language::Rust.comment_syntax().tokens();
        assert_eq!(tokens.last(), Some(&"*"));
    }
}
