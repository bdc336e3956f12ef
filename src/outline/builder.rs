//! Page-by-page outline assembly.

use super::classifier::SpanClassifier;
use super::config::HeadingConfig;
use crate::model::{HeadingRecord, PageText};

/// Accumulates heading records page by page.
///
/// Records keep discovery order: page order, then block, line and span
/// order within a page. Nothing is deduplicated or nested.
#[derive(Debug)]
pub struct OutlineBuilder<'a> {
    classifier: SpanClassifier<'a>,
    headings: Vec<HeadingRecord>,
    pages_seen: u32,
}

impl<'a> OutlineBuilder<'a> {
    pub fn new(config: &'a HeadingConfig) -> Self {
        Self {
            classifier: SpanClassifier::new(config),
            headings: Vec::new(),
            pages_seen: 0,
        }
    }

    /// Classify every span on `page` and record the headings.
    pub fn add_page(&mut self, page: &PageText) {
        self.pages_seen += 1;
        for span in page.spans() {
            if let Some((level, text)) = self.classifier.classify_span(span) {
                log::debug!("Detected {}: {} (page {})", level, text, page.number);
                self.headings
                    .push(HeadingRecord::new(level, text, page.number));
            }
        }
    }

    /// Number of pages added so far.
    pub fn pages_seen(&self) -> u32 {
        self.pages_seen
    }

    /// Headings collected so far.
    pub fn headings(&self) -> &[HeadingRecord] {
        &self.headings
    }

    pub fn finish(self) -> Vec<HeadingRecord> {
        self.headings
    }
}

/// Build an outline from an ordered sequence of pages.
pub fn build_outline<'p, I>(pages: I, config: &HeadingConfig) -> Vec<HeadingRecord>
where
    I: IntoIterator<Item = &'p PageText>,
{
    let mut builder = OutlineBuilder::new(config);
    for page in pages {
        builder.add_page(page);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, TextBlock, TextLine, TextSpan};

    fn page(number: u32, lines: Vec<Vec<TextSpan>>) -> PageText {
        let mut page = PageText::new(number);
        page.push_block(TextBlock::new(
            lines.into_iter().map(TextLine::new).collect(),
        ));
        page
    }

    #[test]
    fn test_scenario_mixed_levels() {
        let pages = vec![
            page(
                1,
                vec![
                    vec![TextSpan::with_flags("Introduction", 18.0, 0)],
                    vec![TextSpan::with_flags("Plain paragraph text", 10.0, 0)],
                    vec![TextSpan::with_flags("Background", 14.5, 0)],
                ],
            ),
            page(
                2,
                vec![
                    vec![TextSpan::with_flags("Notes", 9.0, 20)],
                    vec![TextSpan::with_flags("APPENDIX", 8.0, 0)],
                ],
            ),
        ];

        let outline = build_outline(&pages, &HeadingConfig::default());
        assert_eq!(
            outline,
            vec![
                HeadingRecord::new(HeadingLevel::H1, "Introduction", 1),
                HeadingRecord::new(HeadingLevel::H2, "Background", 1),
                HeadingRecord::new(HeadingLevel::H3, "Notes", 2),
                HeadingRecord::new(HeadingLevel::H3, "APPENDIX", 2),
            ]
        );
    }

    #[test]
    fn test_order_is_not_sorted_by_level() {
        let pages = vec![page(
            1,
            vec![vec![
                TextSpan::with_flags("Small First", 12.0, 0),
                TextSpan::with_flags("Large Second", 24.0, 0),
            ]],
        )];

        let outline = build_outline(&pages, &HeadingConfig::default());
        let texts: Vec<&str> = outline.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Small First", "Large Second"]);
    }

    #[test]
    fn test_short_spans_skipped() {
        let pages = vec![page(
            3,
            vec![vec![
                TextSpan::with_flags("Hi", 30.0, 20),
                TextSpan::with_flags(" A ", 30.0, 0),
                TextSpan::with_flags("Summary", 30.0, 0),
            ]],
        )];

        let outline = build_outline(&pages, &HeadingConfig::default());
        assert_eq!(
            outline,
            vec![HeadingRecord::new(HeadingLevel::H1, "Summary", 3)]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let pages = vec![
            page(1, vec![vec![TextSpan::with_flags("Chapter", 20.0, 0)]]),
            page(2, vec![vec![TextSpan::with_flags("Chapter", 20.0, 0)]]),
        ];

        let outline = build_outline(&pages, &HeadingConfig::default());
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].page, 1);
        assert_eq!(outline[1].page, 2);
    }

    #[test]
    fn test_builder_incremental() {
        let config = HeadingConfig::default();
        let mut builder = OutlineBuilder::new(&config);
        assert_eq!(builder.pages_seen(), 0);

        builder.add_page(&page(1, vec![vec![TextSpan::with_flags("Title", 18.0, 0)]]));
        builder.add_page(&PageText::new(2));
        assert_eq!(builder.pages_seen(), 2);
        assert_eq!(builder.headings().len(), 1);

        let outline = builder.finish();
        assert_eq!(outline[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_empty_document() {
        let pages: Vec<PageText> = Vec::new();
        assert!(build_outline(&pages, &HeadingConfig::default()).is_empty());
    }
}
