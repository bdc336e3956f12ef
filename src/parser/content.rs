//! Content stream walking.
//!
//! Turns the text operators of a page's content stream into a
//! block/line/span tree. Each `BT`..`ET` text object becomes a block; a
//! vertical move inside it starts a new line. Consecutive shows on one line
//! in the same font and size form a single span. Form XObjects painted with
//! `Do` are walked in place.

use lopdf::content::Operation;
use lopdf::Object;

use crate::model::{PageText, TextBlock, TextLine, TextSpan};

/// Resource lookups needed while walking a content stream.
pub trait ContentResources {
    /// Base font name for a font resource key (e.g. `F1` to `Times-Bold`).
    fn base_font(&self, resource: &[u8]) -> String;

    /// Decode string bytes shown with the given font resource.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;

    /// The Form XObject registered under `name`, or `None` for images and
    /// unknown names.
    fn form(&self, _name: &[u8]) -> Option<FormXObject<Self>>
    where
        Self: Sized,
    {
        None
    }
}

/// A Form XObject ready to be walked.
pub struct FormXObject<R> {
    /// Decoded content stream of the form
    pub operations: Vec<Operation>,
    /// The form's `/Matrix`, mapping form space into the invoking space
    pub matrix: [f32; 6],
    /// Resources the form's content refers to
    pub resources: R,
}

/// TJ adjustments and gaps between shows beyond this many thousandths of an
/// em read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
const DEFAULT_FONT_SIZE: f32 = 12.0;
const DEFAULT_LEADING: f32 = 0.0;
/// Glyph widths are not read; every glyph advances half an em.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const SIZE_TOLERANCE: f32 = 0.01;
/// Forms nested deeper than this are not walked.
pub const MAX_FORM_DEPTH: usize = 8;

/// Walk `operations` and collect the page's text spans.
pub fn collect_page_text<R: ContentResources>(
    page_number: u32,
    operations: &[Operation],
    resources: &R,
) -> PageText {
    let mut walker = Walker::new();
    walker.walk(operations, resources, 0);
    walker.finish(page_number)
}

/// The part of the graphics state that `q`/`Q` and `Do` save and restore.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_LEADING,
        }
    }
}

struct Walker {
    page: Vec<TextBlock>,
    lines: Vec<TextLine>,
    spans: Vec<TextSpan>,
    in_text: bool,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    /// Font resource of the last span on the current line
    span_resource: Vec<u8>,
    /// Estimated x where the last shown text ended
    pen_end: Option<f32>,
}

impl Walker {
    fn new() -> Self {
        Self {
            page: Vec::new(),
            lines: Vec::new(),
            spans: Vec::new(),
            in_text: false,
            state: GraphicsState::default(),
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            span_resource: Vec::new(),
            pen_end: None,
        }
    }

    fn walk<R: ContentResources>(&mut self, operations: &[Operation], resources: &R, depth: usize) {
        for op in operations {
            self.apply(op, resources, depth);
        }
    }

    fn apply<R: ContentResources>(&mut self, op: &Operation, resources: &R, depth: usize) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.saved.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.saved.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }
            "Do" => self.paint_form(operands, resources, depth),
            "BT" => {
                self.end_block();
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {
                self.end_block();
                self.in_text = false;
            }
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(name) = &operands[0] {
                        self.state.font_name = resources.base_font(name);
                        self.state.font_resource = name.clone();
                    }
                    self.state.font_size = number(&operands[1]).unwrap_or(DEFAULT_FONT_SIZE);
                }
            }
            "TL" => {
                if let Some(tl) = operands.first().and_then(number) {
                    self.state.leading = tl;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    if (m.f - self.line_matrix.f).abs() > f32::EPSILON
                        || (m.d - self.line_matrix.d).abs() > f32::EPSILON
                    {
                        self.end_line();
                    }
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = resources.decode(&self.state.font_resource, bytes);
                    let advance = glyph_advance(&text);
                    self.show(text, advance);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let (text, advance) = self.decode_array(items, resources);
                    self.show(text, advance);
                }
            }
            "'" | "\"" => {
                self.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                    let text = resources.decode(&self.state.font_resource, bytes);
                    let advance = glyph_advance(&text);
                    self.show(text, advance);
                }
            }
            _ => {}
        }
    }

    fn paint_form<R: ContentResources>(&mut self, operands: &[Object], resources: &R, depth: usize) {
        let Some(Object::Name(name)) = operands.first() else {
            return;
        };
        if depth >= MAX_FORM_DEPTH {
            log::debug!(
                "Not walking form {}: nested {} deep",
                String::from_utf8_lossy(name),
                depth
            );
            return;
        }
        let Some(form) = resources.form(name) else {
            return;
        };

        let base = self.saved.len();
        self.saved.push(self.state.clone());
        self.state.ctm = Matrix::from_array(form.matrix).multiply(&self.state.ctm);
        self.walk(&form.operations, &form.resources, depth + 1);

        // Unbalanced `q` inside the form must not leak out of it.
        self.saved.truncate(base + 1);
        if let Some(saved) = self.saved.pop() {
            self.state = saved;
        }
    }

    /// Decode a TJ array. Returns the text and its advance in em.
    fn decode_array<R: ContentResources>(&self, items: &[Object], resources: &R) -> (String, f32) {
        let mut combined = String::new();
        let mut advance = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let piece = resources.decode(&self.state.font_resource, bytes);
                    advance += glyph_advance(&piece);
                    combined.push_str(&piece);
                }
                Object::Integer(_) | Object::Real(_) => {
                    // Negative adjustments advance the pen; large ones are word gaps.
                    let adjustment = -number(item).unwrap_or(0.0);
                    advance += adjustment / 1000.0;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        (combined, advance)
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        if ty != 0.0 {
            self.end_line();
        }
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.end_line();
        self.move_line(0.0, -self.state.leading);
    }

    /// Show `text`, advancing the pen by `advance_em`. Text continuing the
    /// last span's font and size is appended to it.
    fn show(&mut self, text: String, advance_em: f32) {
        let font_size = self.state.font_size;
        let em_width = (font_size * self.text_matrix.a).abs();
        let start = self.text_matrix.e;
        let size = font_size * self.text_matrix.multiply(&self.state.ctm).vertical_scale();

        self.text_matrix = Matrix::translation(advance_em * font_size, 0.0).multiply(&self.text_matrix);
        let gap = self.pen_end.map(|end| start - end);
        self.pen_end = Some(self.text_matrix.e);

        if !self.in_text {
            return;
        }

        let span = TextSpan::new(text, size, self.state.font_name.clone());
        if let Some(last) = self.spans.last_mut() {
            let same_run = self.span_resource == self.state.font_resource
                && (last.size - span.size).abs() < SIZE_TOLERANCE
                && last.flags == span.flags;
            if same_run {
                let word_gap = em_width > f32::EPSILON
                    && gap.is_some_and(|g| g / em_width * 1000.0 > TJ_SPACE_THRESHOLD);
                if word_gap
                    && !last.text.ends_with(char::is_whitespace)
                    && !span.text.starts_with(char::is_whitespace)
                {
                    last.text.push(' ');
                }
                last.text.push_str(&span.text);
                return;
            }
        }

        if span.text.trim().is_empty() {
            return;
        }
        self.span_resource = self.state.font_resource.clone();
        self.spans.push(span);
    }

    fn end_line(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(TextLine::new(std::mem::take(&mut self.spans)));
        }
        self.pen_end = None;
    }

    fn end_block(&mut self) {
        self.end_line();
        if !self.lines.is_empty() {
            self.page
                .push(TextBlock::new(std::mem::take(&mut self.lines)));
        }
    }

    fn finish(mut self, page_number: u32) -> PageText {
        self.end_block();
        let mut page = PageText::new(page_number);
        for block in self.page {
            page.push_block(block);
        }
        page
    }
}

fn glyph_advance(text: &str) -> f32 {
    text.chars().count() as f32 * AVG_GLYPH_WIDTH
}

/// A 2D affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_array([a, b, c, d, e, f]: [f32; 6]) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        matrix_values(operands).map(Self::from_array)
    }

    /// `self` applied first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit y vector, i.e. how tall glyphs render.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Six numbers of a PDF matrix, from operands or a `/Matrix` array.
pub(crate) fn matrix_values(objects: &[Object]) -> Option<[f32; 6]> {
    if objects.len() < 6 {
        return None;
    }
    Some([
        number(&objects[0])?,
        number(&objects[1])?,
        number(&objects[2])?,
        number(&objects[3])?,
        number(&objects[4])?,
        number(&objects[5])?,
    ])
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
