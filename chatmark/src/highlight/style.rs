use std::fmt;
use std::ops::Range;

/// The display class of a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleTag {
    Number,
    Type,
    Keyword,
    String,
    Comment,
}

impl StyleTag {
    pub const ALL: [StyleTag; 5] = [
        StyleTag::Number,
        StyleTag::Type,
        StyleTag::Keyword,
        StyleTag::String,
        StyleTag::Comment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StyleTag::Number => "number",
            StyleTag::Type => "type",
            StyleTag::Keyword => "keyword",
            StyleTag::String => "string",
            StyleTag::Comment => "comment",
        }
    }

    /// Case-insensitive inverse of [`StyleTag::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        StyleTag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A half-open byte range of a code block annotated with one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: StyleTag,
}

impl StyledSpan {
    pub fn new(range: Range<usize>, style: StyleTag) -> Self {
        StyledSpan {
            start: range.start,
            end: range.end,
            style,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Per-offset style slots. Painting overwrites whatever an earlier paint left.
#[derive(Debug, Clone)]
pub struct Overlay {
    slots: Vec<Option<StyleTag>>,
}

impl Overlay {
    pub fn new(len: usize) -> Self {
        Overlay {
            slots: vec![None; len],
        }
    }

    pub fn paint(&mut self, span: &StyledSpan) {
        let end = span.end.min(self.slots.len());
        let start = span.start.min(end);
        self.slots[start..end].fill(Some(span.style));
    }

    pub fn style_at(&self, offset: usize) -> Option<StyleTag> {
        self.slots.get(offset).copied().flatten()
    }

    /// Collapse the slots into ordered, non-overlapping, maximal spans.
    pub fn into_spans(self) -> Vec<StyledSpan> {
        let mut spans: Vec<StyledSpan> = Vec::new();
        for (offset, slot) in self.slots.into_iter().enumerate() {
            let Some(style) = slot else { continue };
            match spans.last_mut() {
                Some(last) if last.end == offset && last.style == style => last.end += 1,
                _ => spans.push(StyledSpan::new(offset..offset + 1, style)),
            }
        }
        spans
    }
}
