//! Synthetic PDF fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// One text span: base font, size in points, text.
pub type Span = (&'static str, f32, &'static str);

/// Build a PDF where every span sits in its own text object, top to bottom.
pub fn build_pdf(pages: &[Vec<Span>]) -> Document {
    let mut base_fonts: Vec<&str> = Vec::new();
    for (font, _, _) in pages.iter().flatten() {
        if !base_fonts.contains(font) {
            base_fonts.push(*font);
        }
    }

    let page_ops = pages
        .iter()
        .map(|spans| {
            let mut operations = Vec::new();
            let mut y = 780;
            for (font, size, text) in spans {
                let font_idx = base_fonts.iter().position(|f| f == font).unwrap_or(0) + 1;
                operations.push(Operation::new("BT", vec![]));
                operations.push(tf(font_idx, *size));
                operations.push(Operation::new("Td", vec![72.into(), y.into()]));
                operations.push(tj(text));
                operations.push(Operation::new("ET", vec![]));
                y -= 30;
            }
            operations
        })
        .collect();

    build_pdf_with(&base_fonts, page_ops, Vec::new())
}

/// `Tf` selecting font `F<index>` (1-based, in `base_fonts` order).
pub fn tf(index: usize, size: f32) -> Operation {
    Operation::new(
        "Tf",
        vec![Object::Name(format!("F{}", index).into_bytes()), size.into()],
    )
}

/// `Tj` showing `text`.
pub fn tj(text: &str) -> Operation {
    Operation::new("Tj", vec![Object::string_literal(text)])
}

/// Build a PDF from raw page operations. Fonts are registered as `F1..Fn`
/// in `base_fonts` order; `forms` become Form XObjects available to every
/// page under their names, sharing the page fonts.
pub fn build_pdf_with(
    base_fonts: &[&str],
    pages: Vec<Vec<Operation>>,
    forms: Vec<(&str, Vec<Operation>)>,
) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for (i, base_font) in base_fonts.iter().enumerate() {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        });
        fonts.set(format!("F{}", i + 1), font_id);
    }

    let mut xobjects = Dictionary::new();
    for (name, operations) in forms {
        let content = Content { operations };
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! { "Font" => fonts.clone() },
            },
            content.encode().unwrap(),
        ));
        xobjects.set(name, form_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a synthetic PDF to `path`.
pub fn write_pdf(path: &Path, pages: &[Vec<Span>]) {
    let mut doc = build_pdf(pages);
    doc.save(path).unwrap();
}

/// Serialize a synthetic PDF to bytes.
pub fn pdf_bytes(pages: &[Vec<Span>]) -> Vec<u8> {
    let mut doc = build_pdf(pages);
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// A two-page report exercising every classification rule.
pub fn sample_report() -> Vec<Vec<Span>> {
    vec![
        vec![
            ("Helvetica", 30.0, "Hi"),
            ("Helvetica-Bold", 18.0, "Introduction"),
            ("Helvetica", 10.0, "Some body text here"),
            ("Times-Bold", 9.0, "Notes"),
        ],
        vec![
            ("Helvetica", 14.0, "Methods"),
            ("Helvetica", 12.0, "Details"),
            ("Helvetica", 8.0, "APPENDIX"),
            ("Helvetica-Bold", 9.0, "Bold but not flagged"),
        ],
    ]
}
