//! Document title detection.

use super::config::HeadingConfig;
use crate::model::PageText;

/// First span on `page` that passes the length pre-filter and is at least
/// H1-sized, trimmed. Stops at the first match.
pub fn find_title<'p>(page: &'p PageText, config: &HeadingConfig) -> Option<&'p str> {
    page.spans()
        .filter(|span| span.size >= config.h1_size)
        .map(|span| span.trimmed())
        .find(|text| config.passes_prefilter(text))
}

/// Title of a document from its first page, or the configured untitled
/// label when there is no first page or no title-sized span on it.
pub fn extract_title(first_page: Option<&PageText>, config: &HeadingConfig) -> String {
    first_page
        .and_then(|page| find_title(page, config))
        .map(str::to_string)
        .unwrap_or_else(|| config.untitled_label.clone())
}
