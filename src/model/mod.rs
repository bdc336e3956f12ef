//! Data model: span trees coming in, outline records going out.

mod outline;
mod span;

pub use outline::{DocumentResult, HeadingLevel, HeadingRecord};
pub use span::{style, style_flags_for_font, PageText, TextBlock, TextLine, TextSpan};
