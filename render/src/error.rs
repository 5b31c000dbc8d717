use std::fmt;

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    /// A theme file that is not valid TOML or names a bad color.
    Theme(String),
    /// A transcript file that does not describe a list of messages.
    Transcript(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(err) => write!(f, "I/O error: {}", err),
            RenderError::Theme(msg) => write!(f, "theme error: {}", msg),
            RenderError::Transcript(msg) => write!(f, "transcript error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}
