use std::io::Write;

use chatmark::{Block, Message, StyleTag};
use codespan_reporting::term::termcolor::Buffer;
use render::{RenderError, Theme, Transcript};

fn render_plain(transcript: &Transcript) -> String {
    let mut buffer = Buffer::no_color();
    transcript
        .render(&mut buffer, &Theme::default())
        .expect("render failed");
    String::from_utf8(buffer.into_inner()).unwrap()
}

#[test]
fn message_pairs_code_blocks_with_spans() {
    let message = Message::parse("Try this:\n```java\nint n = 5;\n```\nDone.");
    assert_eq!(message.parts.len(), 3);

    let (first, spans) = &message.parts[0];
    assert_eq!(first, &Block::text("Try this:"));
    assert!(spans.is_none());

    let (code, spans) = &message.parts[1];
    assert_eq!(code.language(), Some("java"));
    let spans = spans.as_ref().expect("code blocks carry spans");
    let styled: Vec<(&str, StyleTag)> = spans
        .iter()
        .map(|s| (&code.content()[s.range()], s.style))
        .collect();
    assert_eq!(
        styled,
        vec![("int", StyleTag::Keyword), ("5", StyleTag::Number)]
    );

    assert!(message.parts[2].1.is_none());
}

#[test]
fn transcript_file_renders_each_role() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[message]]
role = "user"
content = "show me a loop"

[[message]]
role = "assistant"
content = """
Here:
```python
for i in range(3):
    print(i)
```"""
"#
    )
    .unwrap();

    let transcript = Transcript::load(file.path()).expect("transcript loads");
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(
        render_plain(&transcript),
        "user:\nshow me a loop\n\nassistant:\nHere:\nPYTHON\nfor i in range(3):\n    print(i)\n"
    );
}

#[test]
fn theme_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "string = \"#00ff00\"\nlabel = \"#123456\"").unwrap();

    let theme = Theme::load(file.path()).expect("theme loads");
    assert_eq!(theme.style(StyleTag::String).color, render::Rgb(0, 0xFF, 0));
    assert_eq!(theme.label.color, render::Rgb(0x12, 0x34, 0x56));
    assert_eq!(theme.keyword, Theme::default().keyword);
}

#[test]
fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(Theme::load(&missing), Err(RenderError::Io(_))));
    assert!(matches!(Transcript::load(&missing), Err(RenderError::Io(_))));
}
