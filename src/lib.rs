//! # pdfoutline
//!
//! Heuristic title and outline extraction for PDF documents.
//!
//! Every text span in a document is classified as an H1, H2 or H3 heading
//! (or not a heading) from its font size, style flags and case. The result
//! is a title plus a flat, ordered outline, written as JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render, JsonFormat};
//!
//! let result = extract_outline("document.pdf");
//! println!("{}", render::to_json(&result, JsonFormat::Pretty)?);
//! # Ok::<(), pdfoutline::Error>(())
//! ```
//!
//! ## Batch mode
//!
//! ```no_run
//! use std::path::Path;
//! use pdfoutline::{BatchRunner, OutlineOptions};
//!
//! let runner = BatchRunner::new("output", OutlineOptions::default());
//! let report = runner.run(Path::new("input"))?;
//! println!("{} of {} files extracted", report.extracted(), report.total());
//! # Ok::<(), pdfoutline::Error>(())
//! ```

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod outline;
pub mod parser;
pub mod processor;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchEvent, BatchReport, BatchRunner, FileReport, FileStatus};
pub use error::{Error, Result};
pub use model::{DocumentResult, HeadingLevel, HeadingRecord, PageText, TextSpan};
pub use options::{ErrorMode, OutlineOptions};
pub use outline::{HeadingConfig, SpanClassifier};
pub use parser::{DocumentLoader, LopdfBackend, LopdfLoader, PdfBackend};
pub use processor::{DocumentProcessor, ProcessedDocument};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the title and outline of a PDF file with default thresholds.
///
/// Never fails: an unreadable file yields its file stem as title and an
/// empty outline.
///
/// # Example
///
/// ```no_run
/// let result = pdfoutline::extract_outline("report.pdf");
/// for heading in &result.outline {
///     println!("{} {} (page {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> DocumentResult {
    extract_outline_with_options(path, OutlineOptions::default())
}

/// Extract the title and outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_with_options, HeadingConfig, OutlineOptions};
///
/// let options = OutlineOptions::new()
///     .with_heading_config(HeadingConfig::new().with_sizes(24.0, 16.0, 12.0));
/// let result = extract_outline_with_options("report.pdf", options);
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> DocumentResult {
    DocumentProcessor::new(options)
        .process(path.as_ref())
        .result
}

/// Extract a PDF held in memory. Unlike the file-based entry points this
/// reports open failures, since there is no file name to fall back on.
pub fn extract_outline_from_bytes(data: &[u8], options: OutlineOptions) -> Result<DocumentResult> {
    let backend = LopdfBackend::from_bytes(data)?;
    DocumentProcessor::new(options).process_backend(&backend)
}

/// Extract a PDF and serialize the result as JSON.
pub fn outline_to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = extract_outline(path);
    render::to_json(&result, format)
}
