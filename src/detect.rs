//! PDF file recognition: extension matching and header sniffing.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// File extension the batch runner picks up.
pub const PDF_EXTENSION: &str = "pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g. "1.7"

/// Readers accept junk (a BOM, mail headers) before `%PDF-` as long as the
/// header starts within this many bytes.
pub const HEADER_SEARCH_LEN: usize = 1024;

/// Version information read from a `%PDF-x.y` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g. "1.7", "2.0")
    pub version: String,
    /// Byte offset of `%PDF-` in the file
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Whether `path` carries the `.pdf` extension (ASCII case-insensitive).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// Read the first bytes of a file and parse its PDF header.
pub fn sniff_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_LEN + PDF_MAGIC.len() + VERSION_LEN);
    file.take((HEADER_SEARCH_LEN + PDF_MAGIC.len() + VERSION_LEN) as u64)
        .read_to_end(&mut head)?;
    parse_header(&head)
}

/// Find and parse a `%PDF-x.y` header in the first [`HEADER_SEARCH_LEN`]
/// bytes of `data`.
pub fn parse_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_LEN)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let raw = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    match raw {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfHeader {
                version: String::from_utf8_lossy(raw).into_owned(),
                offset,
            })
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(raw).into_owned(),
        )),
    }
}
