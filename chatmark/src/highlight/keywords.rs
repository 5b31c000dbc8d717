//! Reserved words per language, in the order the keyword pass applies them.

pub const KOTLIN: &[&str] = &[
    "val", "var", "fun", "class", "object", "interface", "return", "if", "else", "when", "for",
    "while", "package", "import", "true", "false", "null", "super", "this",
];

pub const JAVA: &[&str] = &[
    "public", "private", "protected", "class", "interface", "extends", "implements", "return",
    "if", "else", "for", "while", "new", "static", "void", "int", "boolean", "true", "false",
    "null",
];

pub const PYTHON: &[&str] = &[
    "def", "class", "return", "if", "else", "elif", "for", "while", "import", "from", "as", "try",
    "except", "print", "True", "False", "None",
];

pub const JAVASCRIPT: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "class", "import",
    "export", "true", "false", "null", "undefined",
];

/// Used for every language without its own entry, including an empty tag.
pub const DEFAULT: &[&str] = &[
    "fun", "def", "function", "class", "return", "if", "else", "for", "while", "true", "false",
    "null",
];

/// Keyed by normalized language name. The fallback set is always last.
pub const TABLE: &[(&str, &[&str])] = &[
    ("kotlin", KOTLIN),
    ("java", JAVA),
    ("python", PYTHON),
    ("javascript", JAVASCRIPT),
    ("default", DEFAULT),
];

/// Index into [`TABLE`] for a normalized language name.
pub fn table_index(language: &str) -> usize {
    TABLE
        .iter()
        .position(|(name, _)| *name == language)
        .unwrap_or(TABLE.len() - 1)
}
