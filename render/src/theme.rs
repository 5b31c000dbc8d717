//! Colors for highlighted code and formatted prose.
//!
//! The default palette is a dark theme. A TOML file can override any entry:
//!
//! ```toml
//! keyword = "#ff0000"
//! keyword_bold = false
//! comment = "6272a4"
//! ```

use std::fmt;
use std::path::Path;

use chatmark::StyleTag;
use codespan_reporting::term::termcolor::{Color, ColorSpec};
use serde::Deserialize;

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse(hex: &str) -> Option<Rgb> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A foreground color plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub color: Rgb,
    pub bold: bool,
}

impl Paint {
    pub const fn new(color: Rgb) -> Self {
        Paint { color, bold: false }
    }

    pub const fn bold(color: Rgb) -> Self {
        Paint { color, bold: true }
    }

    pub fn spec(&self) -> ColorSpec {
        let Rgb(r, g, b) = self.color;
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Rgb(r, g, b))).set_bold(self.bold);
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub keyword: Paint,
    pub string: Paint,
    pub comment: Paint,
    pub number: Paint,
    pub type_name: Paint,
    /// Code text no pass touched.
    pub plain: Paint,
    pub heading: Paint,
    pub bullet: Paint,
    pub number_marker: Paint,
    pub prose: Paint,
    pub strong: Paint,
    /// The language label above a code block.
    pub label: Paint,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            keyword: Paint::bold(Rgb(0xFF, 0x79, 0xC6)),
            string: Paint::new(Rgb(0xF1, 0xFA, 0x8C)),
            comment: Paint::new(Rgb(0x62, 0x72, 0xA4)),
            number: Paint::new(Rgb(0xBD, 0x93, 0xF9)),
            type_name: Paint::new(Rgb(0x8B, 0xE9, 0xFD)),
            plain: Paint::new(Rgb(0xF8, 0xF8, 0xF2)),
            heading: Paint::bold(Rgb(0x00, 0xFF, 0x9D)),
            bullet: Paint::bold(Rgb(0x00, 0xE5, 0xFF)),
            number_marker: Paint::bold(Rgb(0xD5, 0x00, 0xF9)),
            prose: Paint::new(Rgb(0xEE, 0xEE, 0xEE)),
            strong: Paint::bold(Rgb(0xFF, 0xFF, 0xFF)),
            label: Paint::bold(Rgb(0x8F, 0x93, 0xA2)),
        }
    }
}

impl Theme {
    /// The paint for a highlighted code range.
    pub fn style(&self, tag: StyleTag) -> Paint {
        match tag {
            StyleTag::Number => self.number,
            StyleTag::Type => self.type_name,
            StyleTag::Keyword => self.keyword,
            StyleTag::String => self.string,
            StyleTag::Comment => self.comment,
        }
    }

    /// The default theme with the overrides from a TOML document applied.
    pub fn from_toml(source: &str) -> Result<Theme, RenderError> {
        let file: ThemeFile =
            toml::from_str(source).map_err(|e| RenderError::Theme(e.to_string()))?;
        let mut theme = Theme::default();
        file.apply(&mut theme)?;
        Ok(theme)
    }

    pub fn load(path: &Path) -> Result<Theme, RenderError> {
        let source = std::fs::read_to_string(path)?;
        let theme = Theme::from_toml(&source)?;
        tracing::debug!(path = %path.display(), "loaded theme");
        Ok(theme)
    }
}

// ---------------------------------------------------------------------------
// Theme file
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeFile {
    keyword: Option<String>,
    keyword_bold: Option<bool>,
    string: Option<String>,
    string_bold: Option<bool>,
    comment: Option<String>,
    comment_bold: Option<bool>,
    number: Option<String>,
    number_bold: Option<bool>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    type_bold: Option<bool>,
    plain: Option<String>,
    heading: Option<String>,
    heading_bold: Option<bool>,
    bullet: Option<String>,
    number_marker: Option<String>,
    prose: Option<String>,
    strong: Option<String>,
    label: Option<String>,
}

impl ThemeFile {
    fn apply(&self, theme: &mut Theme) -> Result<(), RenderError> {
        let entries: [(&str, &Option<String>, Option<bool>, &mut Paint); 12] = [
            ("keyword", &self.keyword, self.keyword_bold, &mut theme.keyword),
            ("string", &self.string, self.string_bold, &mut theme.string),
            ("comment", &self.comment, self.comment_bold, &mut theme.comment),
            ("number", &self.number, self.number_bold, &mut theme.number),
            ("type", &self.type_name, self.type_bold, &mut theme.type_name),
            ("plain", &self.plain, None, &mut theme.plain),
            ("heading", &self.heading, self.heading_bold, &mut theme.heading),
            ("bullet", &self.bullet, None, &mut theme.bullet),
            ("number_marker", &self.number_marker, None, &mut theme.number_marker),
            ("prose", &self.prose, None, &mut theme.prose),
            ("strong", &self.strong, None, &mut theme.strong),
            ("label", &self.label, None, &mut theme.label),
        ];

        for (name, color, bold, paint) in entries {
            if let Some(hex) = color {
                paint.color = Rgb::parse(hex).ok_or_else(|| {
                    RenderError::Theme(format!("invalid color for `{}`: {:?}", name, hex))
                })?;
                tracing::trace!(entry = name, color = %paint.color, "theme override");
            }
            if let Some(bold) = bold {
                paint.bold = bold;
            }
        }
        Ok(())
    }
}
