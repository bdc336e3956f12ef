//! PDF access: opening documents and reading per-page span trees.

mod backend;
mod content;

pub use backend::{decode_text_simple, DocumentLoader, LopdfBackend, LopdfLoader, PdfBackend};
pub use content::{collect_page_text, ContentResources, FormXObject, MAX_FORM_DEPTH};
