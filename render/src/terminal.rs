use std::io::{self, Write};

use chatmark::Block;
use chatmark::prose::{self, Inline, ProseLine};
use codespan_reporting::term::termcolor::WriteColor;

use crate::theme::{Paint, Theme};

/// Shown above a code block that declared no language.
pub const UNLABELED_CODE: &str = "CODE";

/// Segment, highlight and write one assistant message.
pub fn render_message(out: &mut dyn WriteColor, text: &str, theme: &Theme) -> io::Result<()> {
    for block in chatmark::segment(text) {
        match &block {
            Block::Code { language, content } => render_code(out, language, content, theme)?,
            Block::Text { content } => render_prose(out, content, theme)?,
        }
    }
    Ok(())
}

/// Write a code block: a label line, then the highlighted content.
pub fn render_code(
    out: &mut dyn WriteColor,
    language: &str,
    content: &str,
    theme: &Theme,
) -> io::Result<()> {
    let label = if language.trim().is_empty() {
        UNLABELED_CODE.to_string()
    } else {
        language.to_uppercase()
    };
    painted(out, theme.label, &label)?;
    writeln!(out)?;

    let mut cursor = 0;
    for span in chatmark::highlight(content, language) {
        painted(out, theme.plain, &content[cursor..span.start])?;
        painted(out, theme.style(span.style), &content[span.range()])?;
        cursor = span.end;
    }
    painted(out, theme.plain, &content[cursor..])?;
    writeln!(out)
}

/// Write a prose block line by line. Blank lines are skipped.
pub fn render_prose(out: &mut dyn WriteColor, content: &str, theme: &Theme) -> io::Result<()> {
    for line in prose::format(content) {
        match &line {
            ProseLine::Heading(text) => painted(out, theme.heading, text)?,
            ProseLine::Bullet(inlines) => {
                painted(out, theme.bullet, "•")?;
                write!(out, " ")?;
                render_inlines(out, inlines, theme)?;
            }
            ProseLine::Numbered { number, content } => {
                painted(out, theme.number_marker, &format!("{}.", number))?;
                write!(out, " ")?;
                render_inlines(out, content, theme)?;
            }
            ProseLine::Paragraph(inlines) => render_inlines(out, inlines, theme)?,
            ProseLine::Blank => continue,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_inlines(out: &mut dyn WriteColor, inlines: &[Inline], theme: &Theme) -> io::Result<()> {
    for inline in inlines {
        let paint = if inline.is_strong() {
            theme.strong
        } else {
            theme.prose
        };
        painted(out, paint, inline.text())?;
    }
    Ok(())
}

fn painted(out: &mut dyn WriteColor, paint: Paint, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    out.set_color(&paint.spec())?;
    out.write_all(text.as_bytes())?;
    out.reset()
}
