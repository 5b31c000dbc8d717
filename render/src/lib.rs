pub mod error;
pub mod terminal;
pub mod theme;
pub mod transcript;

pub use error::RenderError;
pub use terminal::{render_code, render_message, render_prose};
pub use theme::{Paint, Rgb, Theme};
pub use transcript::{ChatMessage, Role, Transcript};
