//! Heading detection thresholds.

use crate::error::{Error, Result};

/// Font size (in points) at or above which a span is an H1.
pub const DEFAULT_H1_SIZE: f32 = 18.0;
/// Font size at or above which a span is an H2.
pub const DEFAULT_H2_SIZE: f32 = 14.0;
/// Font size at or above which a span is an H3.
pub const DEFAULT_H3_SIZE: f32 = 11.0;
/// Style flags value that marks a small span as a minor heading.
pub const DEFAULT_BOLD_FLAG: u32 = 20;
/// Spans with fewer trimmed characters than this are never headings.
pub const DEFAULT_MIN_TEXT_LEN: usize = 3;
/// Title used when page 1 has no span at H1 size.
pub const DEFAULT_UNTITLED_LABEL: &str = "Untitled Document";

/// Threshold profile for heading classification.
///
/// Size thresholds are inclusive. `bold_flag` is compared with `==`
/// against the span's whole style bitmask, not tested bit by bit.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingConfig {
    /// Minimum font size for H1
    pub h1_size: f32,

    /// Minimum font size for H2
    pub h2_size: f32,

    /// Minimum font size for H3
    pub h3_size: f32,

    /// Exact style flags value that makes a small span an H3
    pub bold_flag: u32,

    /// Minimum trimmed text length, in characters
    pub min_text_len: usize,

    /// Title used when no title span is found on page 1
    pub untitled_label: String,
}

impl HeadingConfig {
    /// Create a config with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all three size thresholds.
    pub fn with_sizes(mut self, h1: f32, h2: f32, h3: f32) -> Self {
        self.h1_size = h1;
        self.h2_size = h2;
        self.h3_size = h3;
        self
    }

    /// Set the H1 size threshold.
    pub fn with_h1_size(mut self, size: f32) -> Self {
        self.h1_size = size;
        self
    }

    /// Set the H2 size threshold.
    pub fn with_h2_size(mut self, size: f32) -> Self {
        self.h2_size = size;
        self
    }

    /// Set the H3 size threshold.
    pub fn with_h3_size(mut self, size: f32) -> Self {
        self.h3_size = size;
        self
    }

    /// Set the style flags value treated as a minor heading.
    pub fn with_bold_flag(mut self, flag: u32) -> Self {
        self.bold_flag = flag;
        self
    }

    /// Set the minimum trimmed text length.
    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Set the title used when page 1 has no title span.
    pub fn with_untitled_label(mut self, label: impl Into<String>) -> Self {
        self.untitled_label = label.into();
        self
    }

    /// Check that thresholds are finite, positive and descending.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("h1", self.h1_size),
            ("h2", self.h2_size),
            ("h3", self.h3_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::Config(format!(
                    "{} size must be a positive number, got {}",
                    name, size
                )));
            }
        }
        if self.h1_size < self.h2_size || self.h2_size < self.h3_size {
            return Err(Error::Config(format!(
                "sizes must satisfy h1 >= h2 >= h3, got {} / {} / {}",
                self.h1_size, self.h2_size, self.h3_size
            )));
        }
        Ok(())
    }

    /// Whether trimmed `text` is long enough to be considered at all.
    pub fn passes_prefilter(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() >= self.min_text_len
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            h1_size: DEFAULT_H1_SIZE,
            h2_size: DEFAULT_H2_SIZE,
            h3_size: DEFAULT_H3_SIZE,
            bold_flag: DEFAULT_BOLD_FLAG,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            untitled_label: DEFAULT_UNTITLED_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HeadingConfig::default();
        assert_eq!(config.h1_size, 18.0);
        assert_eq!(config.h2_size, 14.0);
        assert_eq!(config.h3_size, 11.0);
        assert_eq!(config.bold_flag, 20);
        assert_eq!(config.min_text_len, 3);
        assert_eq!(config.untitled_label, "Untitled Document");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = HeadingConfig::new()
            .with_sizes(24.0, 16.0, 12.0)
            .with_bold_flag(16)
            .with_min_text_len(4)
            .with_untitled_label("No Title");

        assert_eq!(config.h1_size, 24.0);
        assert_eq!(config.h2_size, 16.0);
        assert_eq!(config.h3_size, 12.0);
        assert_eq!(config.bold_flag, 16);
        assert_eq!(config.min_text_len, 4);
        assert_eq!(config.untitled_label, "No Title");
    }

    #[test]
    fn test_validate_rejects_unordered_sizes() {
        let config = HeadingConfig::new().with_h2_size(20.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let config = HeadingConfig::new().with_sizes(18.0, 14.0, 0.0);
        assert!(config.validate().is_err());

        let config = HeadingConfig::new().with_h1_size(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prefilter_counts_characters() {
        let config = HeadingConfig::default();
        assert!(!config.passes_prefilter(""));
        assert!(!config.passes_prefilter("Hi"));
        assert!(config.passes_prefilter("Hey"));
        // Three characters, more than three bytes
        assert!(config.passes_prefilter("개요서"));
    }

    #[test]
    fn test_prefilter_zero_min_len_still_rejects_empty() {
        let config = HeadingConfig::new().with_min_text_len(0);
        assert!(!config.passes_prefilter(""));
        assert!(config.passes_prefilter("a"));
    }
}
