//! Regex-pass syntax highlighting for code blocks in chat messages.
//!
//! Six passes run over the unmodified source in a fixed order: numbers,
//! capitalized words, keywords, double-quoted strings, single-quoted
//! strings, line comments. Each pass scans the whole text on its own, and
//! where ranges overlap the later pass wins. Strings and comments therefore
//! erase any number, type or keyword coloring that fell inside them.
//!
//! Quoted strings are matched non-greedily without escape handling, so
//! `"a\"b"` ends at the escaped quote.

pub mod keywords;
pub mod style;

use std::sync::OnceLock;

use regex::Regex;

pub use style::{Overlay, StyleTag, StyledSpan};

/// A language identifier normalized for keyword lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(String);

impl Language {
    pub fn new(raw: &str) -> Self {
        Language(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Python is the one language whose comments start with `#`.
    pub fn is_python(&self) -> bool {
        self.0 == "python"
    }

    fn comment_pattern(&self) -> &'static Regex {
        if self.is_python() {
            hash_comment_regex()
        } else {
            slash_comment_regex()
        }
    }
}

/// The ordered keyword list for `language`, falling back to the default set.
pub fn keywords_for(language: &str) -> &'static [&'static str] {
    let index = keywords::table_index(Language::new(language).as_str());
    keywords::TABLE[index].1
}

/// Highlight `code`, returning ordered, non-overlapping spans.
///
/// Offsets are byte offsets into `code` and always fall on char boundaries.
pub fn highlight(code: &str, language: &str) -> Vec<StyledSpan> {
    let mut overlay = Overlay::new(code.len());
    for span in highlight_passes(code, language) {
        overlay.paint(&span);
    }
    overlay.into_spans()
}

/// Every match of every pass in application order, before overlap resolution.
pub fn highlight_passes(code: &str, language: &str) -> Vec<StyledSpan> {
    let language = Language::new(language);
    let mut spans = Vec::new();

    collect(&mut spans, number_regex(), code, StyleTag::Number);
    collect(&mut spans, type_regex(), code, StyleTag::Type);
    for pattern in keyword_regexes(&language) {
        collect(&mut spans, pattern, code, StyleTag::Keyword);
    }
    collect(&mut spans, double_quote_regex(), code, StyleTag::String);
    collect(&mut spans, single_quote_regex(), code, StyleTag::String);
    collect(&mut spans, language.comment_pattern(), code, StyleTag::Comment);

    tracing::trace!(language = language.as_str(), spans = spans.len(), "highlight passes");
    spans
}

fn collect(spans: &mut Vec<StyledSpan>, pattern: &Regex, code: &str, style: StyleTag) {
    spans.extend(
        pattern
            .find_iter(code)
            .map(|m| StyledSpan::new(m.range(), style)),
    );
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static NUMBER: OnceLock<Regex> = OnceLock::new();
static TYPE: OnceLock<Regex> = OnceLock::new();
static DOUBLE_QUOTE: OnceLock<Regex> = OnceLock::new();
static SINGLE_QUOTE: OnceLock<Regex> = OnceLock::new();
static HASH_COMMENT: OnceLock<Regex> = OnceLock::new();
static SLASH_COMMENT: OnceLock<Regex> = OnceLock::new();
static KEYWORDS: OnceLock<Vec<Vec<Regex>>> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\b[0-9]+\b").expect("Invalid number regex"))
}

fn type_regex() -> &'static Regex {
    TYPE.get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z0-9]*\b").expect("Invalid type regex"))
}

fn double_quote_regex() -> &'static Regex {
    DOUBLE_QUOTE.get_or_init(|| Regex::new(r#"".*?""#).expect("Invalid string regex"))
}

fn single_quote_regex() -> &'static Regex {
    SINGLE_QUOTE.get_or_init(|| Regex::new(r"'.*?'").expect("Invalid string regex"))
}

fn hash_comment_regex() -> &'static Regex {
    HASH_COMMENT.get_or_init(|| Regex::new(r"#.*").expect("Invalid comment regex"))
}

fn slash_comment_regex() -> &'static Regex {
    SLASH_COMMENT.get_or_init(|| Regex::new(r"//.*").expect("Invalid comment regex"))
}

fn keyword_regexes(language: &Language) -> &'static [Regex] {
    let compiled = KEYWORDS.get_or_init(|| {
        keywords::TABLE
            .iter()
            .map(|(_, words)| {
                words
                    .iter()
                    .map(|word| {
                        Regex::new(&format!(r"\b{}\b", regex::escape(word)))
                            .expect("Invalid keyword regex")
                    })
                    .collect()
            })
            .collect()
    });
    &compiled[keywords::table_index(language.as_str())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, style: StyleTag) -> StyledSpan {
        StyledSpan { start, end, style }
    }

    /// The text covered by each resolved span, paired with its style.
    fn tokens<'a>(code: &'a str, language: &str) -> Vec<(&'a str, StyleTag)> {
        highlight(code, language)
            .into_iter()
            .map(|s| (&code[s.range()], s.style))
            .collect()
    }

    #[test]
    fn python_comment_overrides_type_and_number() {
        assert_eq!(
            highlight("# Type 5", "python"),
            vec![span(0, 8, StyleTag::Comment)]
        );
    }

    #[test]
    fn raw_passes_keep_overwritten_matches() {
        assert_eq!(
            highlight_passes("# Type 5", "python"),
            vec![
                span(7, 8, StyleTag::Number),
                span(2, 6, StyleTag::Type),
                span(0, 8, StyleTag::Comment),
            ]
        );
    }

    #[test]
    fn strings_suppress_keywords() {
        let code = "x = \"if true\"";
        for language in ["kotlin", "java", "javascript", "", "rust"] {
            let resolved = highlight(code, language);
            assert_eq!(resolved, vec![span(4, 13, StyleTag::String)], "{}", language);
        }
        // The keyword pass still saw them.
        let raw = highlight_passes(code, "kotlin");
        assert!(raw.contains(&span(5, 7, StyleTag::Keyword)));
        assert!(raw.contains(&span(8, 12, StyleTag::Keyword)));
    }

    #[test]
    fn unknown_language_uses_default_keywords() {
        assert_eq!(keywords_for("cobol"), keywords::DEFAULT);
        assert_eq!(keywords_for(""), keywords::DEFAULT);
        assert_eq!(
            tokens("function f() { return 1 }", "cobol"),
            vec![("function", StyleTag::Keyword), ("return", StyleTag::Keyword), ("1", StyleTag::Number)]
        );
    }

    #[test]
    fn language_is_normalized() {
        assert_eq!(keywords_for("  Python "), keywords::PYTHON);
        assert_eq!(keywords_for("KOTLIN"), keywords::KOTLIN);
        assert!(Language::new(" PyThOn").is_python());
        assert!(!Language::new("py").is_python());
    }

    #[test]
    fn kotlin_line() {
        assert_eq!(
            tokens("val Foo = 42 // Note", "kotlin"),
            vec![
                ("val", StyleTag::Keyword),
                ("Foo", StyleTag::Type),
                ("42", StyleTag::Number),
                ("// Note", StyleTag::Comment),
            ]
        );
    }

    #[test]
    fn python_keywords_override_capitalized_words() {
        assert_eq!(
            tokens("x = None if True else Foo", "python"),
            vec![
                ("None", StyleTag::Keyword),
                ("if", StyleTag::Keyword),
                ("True", StyleTag::Keyword),
                ("else", StyleTag::Keyword),
                ("Foo", StyleTag::Type),
            ]
        );
    }

    #[test]
    fn slashes_are_not_comments_in_python_and_hashes_are_elsewhere() {
        assert!(tokens("a // b", "python").is_empty());
        assert!(tokens("a # b", "javascript").is_empty());
    }

    #[test]
    fn keywords_need_word_boundaries() {
        assert!(tokens("iffy format returned", "kotlin").is_empty());
        assert_eq!(tokens("x1 22b 3", "kotlin"), vec![("3", StyleTag::Number)]);
    }

    #[test]
    fn single_quoted_strings() {
        assert_eq!(
            tokens("let c = 'if'", "javascript"),
            vec![("let", StyleTag::Keyword), ("'if'", StyleTag::String)]
        );
    }

    #[test]
    fn escaped_quote_ends_the_string() {
        let code = r#"s = "a\"b""#;
        assert_eq!(
            highlight_passes(code, "java")
                .into_iter()
                .filter(|s| s.style == StyleTag::String)
                .map(|s| &code[s.range()])
                .collect::<Vec<_>>(),
            vec![r#""a\""#]
        );
    }

    #[test]
    fn strings_do_not_span_lines() {
        assert!(tokens("\"open\nclose\"", "java").is_empty());
    }

    #[test]
    fn comment_inside_string_still_wins() {
        assert_eq!(
            tokens("url = \"http://x\"", "javascript"),
            vec![("\"http:", StyleTag::String), ("//x\"", StyleTag::Comment)]
        );
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        let code = "// héllo\nval s = \"ünï\" 7";
        for s in highlight(code, "kotlin") {
            assert!(code.is_char_boundary(s.start));
            assert!(code.is_char_boundary(s.end));
        }
        assert_eq!(
            tokens(code, "kotlin"),
            vec![
                ("// héllo", StyleTag::Comment),
                ("val", StyleTag::Keyword),
                ("\"ünï\"", StyleTag::String),
                ("7", StyleTag::Number),
            ]
        );
    }

    #[test]
    fn empty_and_pathological_input() {
        assert!(highlight("", "python").is_empty());
        assert!(highlight("\"\"\"'", "java").len() <= 1);
        assert!(highlight("\"", "java").is_empty());
    }

    #[test]
    fn resolved_spans_are_ordered_and_disjoint() {
        let code = "class A { fun b() = \"C\" + 'd' // E 12\n}";
        let spans = highlight(code, "kotlin");
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(spans.iter().all(|s| !s.is_empty()));
    }
}
