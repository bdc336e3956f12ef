//! PDF backend abstraction layer.
//!
//! Heading detection only needs two things from a PDF library: the list of
//! pages, and a block/line/span tree for each page. [`PdfBackend`] exposes
//! exactly that, and [`DocumentLoader`] opens a file into a backend, so the
//! processor can be driven by `lopdf` in production and by in-memory pages
//! in tests.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::content::{collect_page_text, matrix_values, ContentResources, FormXObject};
use crate::detect::sniff_header;
use crate::error::{Error, Result};
use crate::model::PageText;

/// Read access to an opened PDF document.
pub trait PdfBackend {
    /// Page numbers (1-indexed) in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// The span tree for one page.
    fn page_text(&self, page_num: u32) -> Result<PageText>;

    /// Total number of pages.
    fn page_count(&self) -> u32 {
        self.page_numbers().len() as u32
    }
}

/// Opens files into a [`PdfBackend`].
pub trait DocumentLoader {
    type Backend: PdfBackend;

    /// Open the document at `path`. The returned backend owns the handle;
    /// dropping it releases the document.
    fn load(&self, path: &Path) -> Result<Self::Backend>;
}

/// Simple text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfBackend {
    /// Load from a file path. The header is checked first so that
    /// non-PDF files fail with [`Error::UnknownFormat`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_header(path)?;
        log::debug!(
            "{}: {} (header at byte {})",
            path.display(),
            header,
            header.offset
        );

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::parse_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", doc.version, pages.len());
        Self { doc, pages }
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, self.pages.len() as u32))
    }
}

impl PdfBackend for LopdfBackend {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page_num: u32) -> Result<PageText> {
        let page_id = self.page_id(page_num)?;
        let content_error = |e: lopdf::Error| Error::ContentStream {
            page: page_num,
            message: e.to_string(),
        };

        let fonts = self.doc.get_page_fonts(page_id).map_err(content_error)?;
        let data = self.doc.get_page_content(page_id).map_err(content_error)?;
        let content = Content::decode(&data).map_err(content_error)?;

        let resources = PageResources {
            doc: &self.doc,
            fonts,
            xobjects: page_xobjects(&self.doc, page_id),
        };
        Ok(collect_page_text(page_num, &content.operations, &resources))
    }
}

/// Levels of the page tree searched for inherited `/Resources`.
const MAX_TREE_DEPTH: usize = 32;
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Fonts and XObjects visible to one content stream.
struct PageResources<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: Option<&'a Dictionary>,
}

impl<'a> PageResources<'a> {
    /// Resources declared by a form. A form without its own `/Resources`
    /// uses those of the content that paints it.
    fn for_form(&self, dict: &'a Dictionary) -> Self {
        match dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve_dict(self.doc, o))
        {
            Some(resources) => Self {
                doc: self.doc,
                fonts: font_map(self.doc, resources),
                xobjects: resources
                    .get(b"XObject")
                    .ok()
                    .and_then(|o| resolve_dict(self.doc, o)),
            },
            None => Self {
                doc: self.doc,
                fonts: self.fonts.clone(),
                xobjects: self.xobjects,
            },
        }
    }
}

impl ContentResources for PageResources<'_> {
    fn base_font(&self, resource: &[u8]) -> String {
        self.fonts
            .get(resource)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string())
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        if let Some(font) = self.fonts.get(resource) {
            if let Ok(encoding) = font.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn form(&self, name: &[u8]) -> Option<FormXObject<Self>> {
        let id = self.xobjects?.get(name).ok()?.as_reference().ok()?;
        let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
        if stream.dict.get(b"Subtype").ok()?.as_name().ok()? != b"Form" {
            return None;
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Skipping form {}: {}",
                    String::from_utf8_lossy(name),
                    e
                );
                return None;
            }
        };
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| m.as_array().ok())
            .and_then(|values| matrix_values(values))
            .unwrap_or(IDENTITY_MATRIX);

        Some(FormXObject {
            operations: content.operations,
            matrix,
            resources: self.for_form(&stream.dict),
        })
    }
}

/// Follow a reference to a dictionary, or take an inline one.
fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// The `/XObject` dictionary of a page, with `/Resources` inherited from
/// the page tree when the page has none.
fn page_xobjects(doc: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Some(resources) = node.get(b"Resources").ok().and_then(|o| resolve_dict(doc, o)) {
            return resources
                .get(b"XObject")
                .ok()
                .and_then(|o| resolve_dict(doc, o));
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Font dictionaries of a `/Resources` dictionary, keyed by resource name.
fn font_map<'a>(doc: &'a LopdfDocument, resources: &'a Dictionary) -> BTreeMap<Vec<u8>, &'a Dictionary> {
    resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve_dict(doc, o))
        .map(|fonts| {
            fonts
                .iter()
                .filter_map(|(name, font)| resolve_dict(doc, font).map(|dict| (name.clone(), dict)))
                .collect()
        })
        .unwrap_or_default()
}

/// [`DocumentLoader`] producing [`LopdfBackend`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLoader;

impl DocumentLoader for LopdfLoader {
    type Backend = LopdfBackend;

    fn load(&self, path: &Path) -> Result<LopdfBackend> {
        LopdfBackend::open(path)
    }
}
