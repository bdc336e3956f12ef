//! Processing options and configuration.

use crate::outline::HeadingConfig;
use crate::render::JsonFormat;

/// Options for extracting and writing outlines.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Heading thresholds and fallbacks
    pub heading: HeadingConfig,

    /// What to do when a single page cannot be read
    pub error_mode: ErrorMode,

    /// Output JSON layout
    pub json_format: JsonFormat,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading configuration.
    pub fn with_heading_config(mut self, config: HeadingConfig) -> Self {
        self.heading = config;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Degrade the whole document when any page fails.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Write compact JSON.
    pub fn compact(mut self) -> Self {
        self.json_format = JsonFormat::Compact;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            error_mode: ErrorMode::Lenient,
            json_format: JsonFormat::Pretty,
        }
    }
}

/// Handling of page-level read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Any page failure degrades the whole document
    Strict,
    /// Log the failure and treat the page as empty
    #[default]
    Lenient,
}
