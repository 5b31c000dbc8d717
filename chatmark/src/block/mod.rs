use std::fmt;

/// One segment of an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Prose lines, newline-joined.
    Text { content: String },
    /// Lines between a pair of fences. `language` is whatever followed the
    /// opening fence, trimmed, and may be empty.
    Code { language: String, content: String },
}

impl Block {
    pub fn text(content: impl Into<String>) -> Self {
        Block::Text {
            content: content.into(),
        }
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Block::Code {
            language: language.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Block::Text { content } | Block::Code { content, .. } => content,
        }
    }

    /// The declared language for code blocks, `None` for prose.
    pub fn language(&self) -> Option<&str> {
        match self {
            Block::Code { language, .. } => Some(language),
            Block::Text { .. } => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code { .. })
    }
}

/// Writes the line-granular source of the block, reinserting fences around
/// code. Every block ends with a newline.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Text { content } => writeln!(f, "{}", content),
            Block::Code { language, content } => {
                writeln!(f, "```{}", language)?;
                writeln!(f, "{}", content)?;
                writeln!(f, "```")
            }
        }
    }
}
