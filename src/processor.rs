//! Per-document processing: open, title, outline.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{DocumentResult, HeadingLevel, PageText};
use crate::options::{ErrorMode, OutlineOptions};
use crate::outline::{extract_title, OutlineBuilder};
use crate::parser::{DocumentLoader, LopdfLoader, PdfBackend};

/// What came out of processing one file.
#[derive(Debug)]
pub struct ProcessedDocument {
    /// The result to persist; always present, possibly degraded
    pub result: DocumentResult,
    /// Number of pages walked
    pub page_count: u32,
    /// Why the result is degraded, if it is
    pub error: Option<Error>,
}

impl ProcessedDocument {
    /// Whether the document could not be read and the result is a fallback.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Turns one PDF file into a [`DocumentResult`].
///
/// Failures never escape: a document that cannot be opened (or, in strict
/// mode, has an unreadable page) yields a result titled with the file stem
/// and an empty outline.
pub struct DocumentProcessor<L = LopdfLoader> {
    loader: L,
    options: OutlineOptions,
}

impl DocumentProcessor<LopdfLoader> {
    /// Create a processor backed by lopdf.
    pub fn new(options: OutlineOptions) -> Self {
        Self::with_loader(LopdfLoader, options)
    }
}

impl Default for DocumentProcessor<LopdfLoader> {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}

impl<L: DocumentLoader> DocumentProcessor<L> {
    /// Create a processor with a custom loader.
    pub fn with_loader(loader: L, options: OutlineOptions) -> Self {
        Self { loader, options }
    }

    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Process the file at `path`. Makes a single attempt; the document
    /// handle is released before this returns.
    pub fn process(&self, path: &Path) -> ProcessedDocument {
        let name = display_name(path);

        let backend = match self.loader.load(path) {
            Ok(backend) => backend,
            Err(e) => {
                log::error!("Failed to open {}: {}", name, e);
                return degraded(path, e);
            }
        };

        match self.process_backend(&backend) {
            Ok(result) => ProcessedDocument {
                result,
                page_count: backend.page_count(),
                error: None,
            },
            Err(e) => {
                log::error!("Failed to read {}: {}", name, e);
                degraded(path, e)
            }
        }
    }

    /// Extract title and outline from an already opened document.
    pub fn process_backend<B: PdfBackend>(&self, backend: &B) -> Result<DocumentResult> {
        let config = &self.options.heading;
        let mut builder = OutlineBuilder::new(config);
        let mut title = None;

        for page_num in backend.page_numbers() {
            let page = self.read_page(backend, page_num)?;
            if title.is_none() {
                title = Some(extract_title(Some(&page), config));
            }
            builder.add_page(&page);
        }

        let title = title.unwrap_or_else(|| extract_title(None, config));
        let result = DocumentResult::new(title, builder.finish());
        log::info!(
            "Extracted {} headings (H1 {}, H2 {}, H3 {}), title {:?}",
            result.outline.len(),
            result.count_level(HeadingLevel::H1),
            result.count_level(HeadingLevel::H2),
            result.count_level(HeadingLevel::H3),
            result.title
        );
        Ok(result)
    }

    fn read_page<B: PdfBackend>(&self, backend: &B, page_num: u32) -> Result<PageText> {
        match backend.page_text(page_num) {
            Ok(page) => Ok(page),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping text of page {}: {}", page_num, e);
                Ok(PageText::new(page_num))
            }
            Err(e) => Err(e),
        }
    }
}

fn degraded(path: &Path, error: Error) -> ProcessedDocument {
    ProcessedDocument {
        result: DocumentResult::fallback(file_stem(path)),
        page_count: 0,
        error: Some(error),
    }
}

/// File name without its extension, used as the fallback title.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
