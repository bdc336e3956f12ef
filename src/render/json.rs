//! JSON rendering for outline results.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::DocumentResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a result. Keys come out as `title`, `outline`, and per entry
/// `level`, `text`, `page`. Non-ASCII text is kept as UTF-8.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result)?,
        JsonFormat::Compact => serde_json::to_string(result)?,
    };
    Ok(json)
}

/// Serialize a result and write it to `path`, replacing any existing file.
pub fn write_json<P: AsRef<Path>>(
    result: &DocumentResult,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(result, format)?;
    fs::write(path, json)?;
    Ok(())
}
