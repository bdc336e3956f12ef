//! Outline result types.

use serde::{Deserialize, Serialize};

/// Coarse heading level assigned from visual cues.
///
/// Levels are flat tags; an H2 is not nested under the preceding H1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Label used in output ("H1", "H2", "H3").
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    /// Heading level
    pub level: HeadingLevel,
    /// Trimmed span text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl HeadingRecord {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title and outline extracted from one document.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Detected title or a fallback
    pub title: String,
    /// Headings in discovery order
    pub outline: Vec<HeadingRecord>,
}

impl DocumentResult {
    pub fn new(title: impl Into<String>, outline: Vec<HeadingRecord>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Result with a fallback title and an empty outline, as written for a
    /// document that could not be read (the title is then its file stem).
    pub fn fallback(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Number of headings of the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|h| h.level == level).count()
    }
}
