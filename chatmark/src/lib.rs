pub mod block;
pub mod highlight;
pub mod prose;
pub mod segment;

pub use block::Block;
pub use highlight::{StyleTag, StyledSpan, highlight};
pub use segment::segment;

/// A message split into blocks, with every code block highlighted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Blocks in source order. `spans` is `Some` exactly for `Block::Code`.
    pub parts: Vec<(Block, Option<Vec<StyledSpan>>)>,
}

impl Message {
    /// Segment `text` and highlight each code block with its declared language.
    pub fn parse(text: &str) -> Self {
        let parts = segment(text)
            .into_iter()
            .map(|block| {
                let spans = match &block {
                    Block::Code { language, content } => Some(highlight(content, language)),
                    Block::Text { .. } => None,
                };
                (block, spans)
            })
            .collect();
        Message { parts }
    }
}
