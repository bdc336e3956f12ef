//! Text spans as produced by the PDF collaborator.
//!
//! A page is a tree of blocks, lines and spans. The tree only carries what
//! heading detection needs: text, font size and a style bitmask.

/// Style flag bits carried by [`TextSpan::flags`].
///
/// Uses the common encoding found in PDF text extractors, so a bold serif
/// span carries `SERIFED | BOLD == 20`.
pub mod style {
    /// Superscript text.
    pub const SUPERSCRIPT: u32 = 1;
    /// Italic or oblique face.
    pub const ITALIC: u32 = 1 << 1;
    /// Serif face.
    pub const SERIFED: u32 = 1 << 2;
    /// Fixed-pitch face.
    pub const MONOSPACED: u32 = 1 << 3;
    /// Bold, black or heavy face.
    pub const BOLD: u32 = 1 << 4;
}

/// A run of text sharing one font and size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content, untrimmed
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Style bitmask (see [`style`])
    pub flags: u32,
    /// Base font name (e.g., "Times-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a span, deriving its style flags from the font name.
    pub fn new(text: impl Into<String>, size: f32, font_name: impl Into<String>) -> Self {
        let font_name = font_name.into();
        Self {
            text: text.into(),
            size,
            flags: style_flags_for_font(&font_name),
            font_name,
        }
    }

    /// Create a span with explicit style flags.
    pub fn with_flags(text: impl Into<String>, size: f32, flags: u32) -> Self {
        Self {
            text: text.into(),
            size,
            flags,
            font_name: String::new(),
        }
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Derive a style bitmask from a PDF base font name.
///
/// Subset prefixes such as `ABCDEF+` are ignored.
pub fn style_flags_for_font(font_name: &str) -> u32 {
    let name = font_name
        .split_once('+')
        .map(|(_, rest)| rest)
        .unwrap_or(font_name)
        .to_lowercase();

    let mut flags = 0;
    if ["bold", "black", "heavy", "semibold"]
        .iter()
        .any(|k| name.contains(k))
    {
        flags |= style::BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        flags |= style::ITALIC;
    }
    if name.contains("courier") || name.contains("mono") {
        flags |= style::MONOSPACED;
    } else if is_serif_face(&name) {
        flags |= style::SERIFED;
    }
    flags
}

fn is_serif_face(name: &str) -> bool {
    if name.contains("sans") {
        return false;
    }
    [
        "times", "serif", "roman", "georgia", "garamond", "cambria", "palatino", "bookman",
        "minion", "baskerville",
    ]
    .iter()
    .any(|k| name.contains(k))
}

/// Spans on one line, in content-stream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Lines inside one text object (`BT` .. `ET`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(TextLine::is_empty)
    }
}

/// The span tree for a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,
    /// Text blocks in document order
    pub blocks: Vec<TextBlock>,
}

impl PageText {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Add a block, ignoring empty ones.
    pub fn push_block(&mut self, block: TextBlock) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    /// Iterate spans in block, line, span order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> + '_ {
        self.blocks
            .iter()
            .flat_map(|block| block.lines.iter())
            .flat_map(|line| line.spans.iter())
    }

    /// Number of spans on the page.
    pub fn span_count(&self) -> usize {
        self.spans().count()
    }
}
