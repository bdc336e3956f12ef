//! Error types for pdfoutline.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening, walking or persisting a document.
///
/// Heading classification itself never fails; these only come from the
/// PDF collaborator and from file I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The header names a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error decoding a page's content stream.
    #[error("Content stream error on page {page}: {message}")]
    ContentStream { page: u32, message: String },

    /// Error serializing a result record.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Invalid heading configuration (e.g. thresholds out of order).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
