pub mod error;

use std::ops::Range;

pub use error::SegmentWarning;

use crate::block::Block;

/// The marker that opens and closes a code block.
pub const FENCE: &str = "```";

/// Split a message into prose and code blocks.
///
/// Total over all input: an unterminated fence is flushed as a final code
/// block. Use [`Segmenter`] to also receive a warning for that case.
pub fn segment(text: &str) -> Vec<Block> {
    Segmenter::new(text, 0).segment().blocks
}

/// The result of segmenting one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmented {
    pub blocks: Vec<Block>,
    pub warnings: Vec<SegmentWarning>,
}

/// Segmenter entry point.
pub struct Segmenter<'a> {
    source: &'a str,
    file_id: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(source: &'a str, file_id: usize) -> Self {
        Segmenter { source, file_id }
    }

    pub fn segment(&self) -> Segmented {
        let mut state = SegmentState::new(self.file_id);
        let mut offset = 0;
        for line in self.source.split('\n') {
            let span = offset..offset + line.len();
            offset = span.end + 1;
            state.feed(line, span);
        }
        let segmented = state.finish();
        tracing::trace!(
            blocks = segmented.blocks.len(),
            warnings = segmented.warnings.len(),
            "segmented message"
        );
        segmented
    }
}

// ---------------------------------------------------------------------------
// Segment state
// ---------------------------------------------------------------------------

struct SegmentState<'a> {
    file_id: usize,
    blocks: Vec<Block>,
    prose: Vec<&'a str>,
    code: Vec<&'a str>,
    language: String,
    /// Span of the opening fence line while inside a code block.
    open_fence: Option<Range<usize>>,
}

impl<'a> SegmentState<'a> {
    fn new(file_id: usize) -> Self {
        SegmentState {
            file_id,
            blocks: Vec::new(),
            prose: Vec::new(),
            code: Vec::new(),
            language: String::new(),
            open_fence: None,
        }
    }

    fn feed(&mut self, line: &'a str, span: Range<usize>) {
        let Some(rest) = line.trim().strip_prefix(FENCE) else {
            if self.open_fence.is_some() {
                self.code.push(line);
            } else {
                self.prose.push(line);
            }
            return;
        };

        if self.open_fence.take().is_some() {
            self.flush_code();
        } else {
            self.flush_prose();
            self.language = rest.trim().to_string();
            self.open_fence = Some(span);
        }
    }

    fn flush_prose(&mut self) {
        let content = self.prose.join("\n");
        self.prose.clear();
        if !content.is_empty() {
            self.blocks.push(Block::Text { content });
        }
    }

    fn flush_code(&mut self) {
        let content = self.code.join("\n");
        self.code.clear();
        let language = std::mem::take(&mut self.language);
        if !content.is_empty() {
            self.blocks.push(Block::Code { language, content });
        }
    }

    fn finish(mut self) -> Segmented {
        let mut warnings = Vec::new();
        if let Some(span) = self.open_fence.take() {
            tracing::debug!(?span, "code fence never closed");
            warnings.push(
                SegmentWarning::new("unterminated code fence", span, self.file_id)
                    .with_note("the block runs to the end of the message"),
            );
        }
        self.flush_prose();
        self.flush_code();
        Segmented {
            blocks: self.blocks,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(blocks: &[Block]) -> String {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn plain_prose_is_one_block() {
        assert_eq!(
            segment("first line\nsecond line"),
            vec![Block::text("first line\nsecond line")]
        );
    }

    #[test]
    fn unterminated_fence_is_flushed_as_code() {
        assert_eq!(
            segment("intro\n```python\nprint(1)"),
            vec![Block::text("intro"), Block::code("python", "print(1)")]
        );
    }

    #[test]
    fn unterminated_fence_warns_at_opening_line() {
        let source = "intro\n```python\nprint(1)";
        let segmented = Segmenter::new(source, 3).segment();
        assert_eq!(segmented.warnings.len(), 1);
        let warning = &segmented.warnings[0];
        assert_eq!(&source[warning.span.clone()], "```python");
        assert_eq!(warning.file_id, 3);
        assert_eq!(warning.to_string(), "unterminated code fence");
    }

    #[test]
    fn closed_fences_do_not_warn() {
        let segmented = Segmenter::new("```\nx\n```", 0).segment();
        assert!(segmented.warnings.is_empty());
    }

    #[test]
    fn adjacent_fences_have_no_text_between() {
        assert_eq!(
            segment("```\ncode1\n```\n```\ncode2\n```"),
            vec![Block::code("", "code1"), Block::code("", "code2")]
        );
    }

    #[test]
    fn language_is_trimmed_and_unvalidated() {
        assert_eq!(
            segment("  ```  my-lang v2  \nbody\n```"),
            vec![Block::code("my-lang v2", "body")]
        );
    }

    #[test]
    fn fence_lines_may_be_indented_and_carry_trailing_text() {
        assert_eq!(
            segment("a\n    ```rust\nlet x = 1;\n    ``` trailing\nb"),
            vec![
                Block::text("a"),
                Block::code("rust", "let x = 1;"),
                Block::text("b"),
            ]
        );
    }

    #[test]
    fn trailing_blank_prose_lines_are_kept() {
        assert_eq!(
            segment("a\n\n```\nx\n```"),
            vec![Block::text("a\n"), Block::code("", "x")]
        );
    }

    #[test]
    fn only_one_trailing_newline_is_stripped_from_code() {
        assert_eq!(
            segment("```\nx\n\n```"),
            vec![Block::code("", "x\n")]
        );
        assert_eq!(
            segment("```\n  indented  \n```"),
            vec![Block::code("", "  indented  ")]
        );
    }

    #[test]
    fn empty_code_blocks_are_suppressed() {
        assert!(segment("```\n```").is_empty());
        assert_eq!(segment("```\n\n```\ntext"), vec![Block::text("text")]);
    }

    #[test]
    fn no_block_is_empty() {
        let inputs = [
            "",
            "\n",
            "```",
            "```\n```\n```",
            "\n```\n\n```\n\n",
            "a\n```\n```\nb",
        ];
        for input in inputs {
            for block in segment(input) {
                assert!(!block.content().is_empty(), "empty block from {:?}", input);
            }
        }
    }

    #[test]
    fn blocks_rebuild_the_input() {
        let input = "intro\n\n```kotlin\nval x = 1\n\nfun f() {}\n```\noutro";
        let blocks = segment(input);
        assert_eq!(blocks.len(), 3);
        assert_eq!(rebuild(&blocks), format!("{}\n", input));
    }

    #[test]
    fn rewrapped_code_segments_identically() {
        let input = "see:\n```js\nconst a = 'x';\n\n```\n```\n  b  \n";
        for block in segment(input) {
            if let Block::Code { .. } = &block {
                assert_eq!(segment(&block.to_string()), vec![block.clone()]);
            }
        }
    }

    #[test]
    fn carriage_returns_stay_in_content() {
        assert_eq!(
            segment("a\r\n```py\r\nx\r\n```\r\n"),
            vec![Block::text("a\r"), Block::code("py", "x\r")]
        );
    }
}
