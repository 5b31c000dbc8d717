use std::fmt;

/// The emphasis marker recognized inside prose.
pub const STRONG: &str = "**";

/// A run of prose text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
}

/// How a single prose line is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProseLine {
    /// A line starting with `#`, with every `#` removed.
    Heading(String),
    /// A `- ` or `* ` list item.
    Bullet(Vec<Inline>),
    /// A `1.` style list item. `number` is the text before the first dot.
    Numbered { number: String, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Blank,
}

/// Classify every line of a prose block.
pub fn format(text: &str) -> Vec<ProseLine> {
    text.split('\n').map(classify).collect()
}

/// Classify one prose line. Headings are detected on the raw line, the
/// list forms on the trimmed line.
pub fn classify(line: &str) -> ProseLine {
    if line.starts_with('#') {
        return ProseLine::Heading(line.replace('#', "").trim().to_string());
    }

    let trimmed = line.trim();
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return ProseLine::Bullet(parse_emphasis(trimmed[1..].trim()));
    }

    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && trimmed[digits..].starts_with('.') {
        return ProseLine::Numbered {
            number: trimmed[..digits].to_string(),
            content: parse_emphasis(trimmed[digits + 1..].trim()),
        };
    }

    if trimmed.is_empty() {
        ProseLine::Blank
    } else {
        ProseLine::Paragraph(parse_emphasis(line))
    }
}

/// Split `text` on `**`. Odd-numbered pieces are strong. An unpaired
/// marker makes the rest of the line strong.
pub fn parse_emphasis(text: &str) -> Vec<Inline> {
    text.split(STRONG)
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(index, part)| {
            if index % 2 == 1 {
                Inline::Strong(part.to_string())
            } else {
                Inline::Text(part.to_string())
            }
        })
        .collect()
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Strong(s) => s,
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, Inline::Strong(_))
    }
}

/// Writes the text without emphasis markers.
impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Writes the line the way a plain-text renderer shows it.
impl fmt::Display for ProseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn inlines(f: &mut fmt::Formatter<'_>, content: &[Inline]) -> fmt::Result {
            for inline in content {
                write!(f, "{}", inline)?;
            }
            Ok(())
        }

        match self {
            ProseLine::Heading(text) => f.write_str(text),
            ProseLine::Bullet(content) => {
                write!(f, "• ")?;
                inlines(f, content)
            }
            ProseLine::Numbered { number, content } => {
                write!(f, "{}. ", number)?;
                inlines(f, content)
            }
            ProseLine::Paragraph(content) => inlines(f, content),
            ProseLine::Blank => Ok(()),
        }
    }
}
