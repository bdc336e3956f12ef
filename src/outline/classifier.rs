//! Span-level heading classification.

use super::config::HeadingConfig;
use crate::model::{HeadingLevel, TextSpan};

/// Maps a span's size, style flags and text to a heading level.
#[derive(Debug, Clone, Copy)]
pub struct SpanClassifier<'a> {
    config: &'a HeadingConfig,
}

impl<'a> SpanClassifier<'a> {
    pub fn new(config: &'a HeadingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeadingConfig {
        self.config
    }

    /// Classify one span. First matching rule wins:
    ///
    /// 1. `size >= h1_size` is H1
    /// 2. `size >= h2_size` is H2
    /// 3. `size >= h3_size` is H3
    /// 4. `flags == bold_flag` or all-uppercase text is H3
    /// 5. anything else is not a heading
    ///
    /// Does not apply the length pre-filter; see [`classify_span`](Self::classify_span).
    pub fn classify(&self, size: f32, flags: u32, text: &str) -> Option<HeadingLevel> {
        let config = self.config;
        if size >= config.h1_size {
            Some(HeadingLevel::H1)
        } else if size >= config.h2_size {
            Some(HeadingLevel::H2)
        } else if size >= config.h3_size {
            Some(HeadingLevel::H3)
        } else if flags == config.bold_flag || is_all_uppercase(text) {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }

    /// Trim, pre-filter and classify a span.
    ///
    /// Returns the trimmed text alongside the level so callers do not
    /// trim twice.
    pub fn classify_span<'s>(&self, span: &'s TextSpan) -> Option<(HeadingLevel, &'s str)> {
        let text = span.trimmed();
        if !self.config.passes_prefilter(text) {
            return None;
        }
        self.classify(span.size, span.flags, text)
            .map(|level| (level, text))
    }
}

/// True when `text` has at least one uppercase character and no lowercase
/// or titlecase ones. Digits, punctuation and uncased scripts are ignored.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        } else if !c.to_uppercase().eq(std::iter::once(c)) {
            // Titlecase letters such as 'ǅ' are neither upper nor lower
            return false;
        }
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(size: f32, flags: u32, text: &str) -> Option<HeadingLevel> {
        let config = HeadingConfig::default();
        SpanClassifier::new(&config).classify(size, flags, text)
    }

    #[test]
    fn test_size_bands() {
        assert_eq!(classify(30.0, 0, "Title"), Some(HeadingLevel::H1));
        assert_eq!(classify(18.0, 0, "Title"), Some(HeadingLevel::H1));
        assert_eq!(classify(17.9, 0, "Section"), Some(HeadingLevel::H2));
        assert_eq!(classify(14.0, 0, "Section"), Some(HeadingLevel::H2));
        assert_eq!(classify(13.99, 0, "Minor"), Some(HeadingLevel::H3));
        assert_eq!(classify(11.0, 0, "Minor"), Some(HeadingLevel::H3));
        assert_eq!(classify(10.99, 0, "body text"), None);
    }

    #[test]
    fn test_large_size_ignores_flags_and_case() {
        assert_eq!(classify(18.0, 20, "lower case"), Some(HeadingLevel::H1));
        assert_eq!(classify(14.0, 20, "UPPER"), Some(HeadingLevel::H2));
    }

    #[test]
    fn test_bold_flag_fallback() {
        assert_eq!(classify(9.0, 20, "Notes"), Some(HeadingLevel::H3));
    }

    #[test]
    fn test_bold_flag_is_exact_match() {
        // Bold bit set, but not the exact configured value
        assert_eq!(classify(9.0, 16, "Notes"), None);
        assert_eq!(classify(9.0, 20 | 2, "Notes"), None);
        assert_eq!(classify(9.0, 4, "Notes"), None);
    }

    #[test]
    fn test_uppercase_fallback() {
        assert_eq!(classify(8.0, 0, "SUMMARY"), Some(HeadingLevel::H3));
        assert_eq!(classify(8.0, 0, "PART 2: RESULTS"), Some(HeadingLevel::H3));
        assert_eq!(classify(8.0, 0, "Summary"), None);
    }

    #[test]
    fn test_small_plain_text_is_not_heading() {
        assert_eq!(classify(10.0, 0, "regular body text"), None);
        assert_eq!(classify(10.0, 4, "1234"), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = HeadingConfig::new()
            .with_sizes(24.0, 20.0, 16.0)
            .with_bold_flag(16);
        let classifier = SpanClassifier::new(&config);

        assert_eq!(classifier.classify(18.0, 0, "Text"), None);
        assert_eq!(classifier.classify(20.0, 0, "Text"), Some(HeadingLevel::H2));
        assert_eq!(classifier.classify(9.0, 16, "Text"), Some(HeadingLevel::H3));
        assert_eq!(classifier.classify(9.0, 20, "Text"), None);
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("ABC"));
        assert!(is_all_uppercase("ABC 123"));
        assert!(is_all_uppercase("ÉTUDE"));
        assert!(!is_all_uppercase("AbC"));
        assert!(!is_all_uppercase("123"));
        assert!(!is_all_uppercase(""));
        assert!(!is_all_uppercase("한국어"));
    }

    #[test]
    fn test_titlecase_letter_is_not_uppercase() {
        assert!(is_all_uppercase("\u{01C4}AB"));
        assert!(!is_all_uppercase("\u{01C5}AB"));
        assert_eq!(classify(8.0, 0, "\u{01C5}AB"), None);
    }

    #[test]
    fn test_classify_span_prefilter() {
        let config = HeadingConfig::default();
        let classifier = SpanClassifier::new(&config);

        let short = TextSpan::with_flags("  Hi  ", 40.0, 20);
        assert_eq!(classifier.classify_span(&short), None);

        let span = TextSpan::with_flags("  Introduction  ", 18.0, 0);
        assert_eq!(
            classifier.classify_span(&span),
            Some((HeadingLevel::H1, "Introduction"))
        );
    }

    #[test]
    fn test_classify_span_uses_trimmed_text_for_case() {
        let config = HeadingConfig::default();
        let classifier = SpanClassifier::new(&config);

        let span = TextSpan::with_flags("  NOTES  ", 8.0, 0);
        assert_eq!(
            classifier.classify_span(&span),
            Some((HeadingLevel::H3, "NOTES"))
        );
    }
}
