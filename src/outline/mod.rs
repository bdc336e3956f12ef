//! Heading classification, title detection and outline assembly.

mod builder;
mod classifier;
mod config;
mod title;

pub use builder::{build_outline, OutlineBuilder};
pub use classifier::{is_all_uppercase, SpanClassifier};
pub use config::{
    HeadingConfig, DEFAULT_BOLD_FLAG, DEFAULT_H1_SIZE, DEFAULT_H2_SIZE, DEFAULT_H3_SIZE,
    DEFAULT_MIN_TEXT_LEN, DEFAULT_UNTITLED_LABEL,
};
pub use title::{extract_title, find_title};
