//! Pluggable documentation text source.
//!
//! The improver asks a [`DocGenerator`] for text first and falls back to the
//! template whenever the generator fails or returns something unusable.

use crate::analyzer::{ConstructKind, Language};
use crate::constants::generation::MAX_GENERATED_CHARS;
use crate::types::{ErrorCategory, LlmError, Result};

use super::format::BlockStyle;

/// What the generator is asked to document
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub kind: ConstructKind,
    pub name: &'a str,
    pub language: Language,
    /// Source lines around the construct
    pub context: String,
}

/// Synchronous documentation source. Implementations enforce their own
/// deadline; an `Err` means "use the template".
pub trait DocGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String>;
}

/// Reduce generated text to plain body lines for `style`.
///
/// Code fences and the style's own comment markers are stripped. Empty text,
/// oversized text, or text containing the block's closing delimiter is
/// rejected.
pub fn sanitize(text: &str, style: BlockStyle, generator: &str) -> Result<Vec<String>> {
    let invalid = |msg: &str| LlmError::with_provider(ErrorCategory::InvalidResponse, msg, generator);

    if text.len() > MAX_GENERATED_CHARS {
        return Err(invalid("generated text too long").into());
    }

    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.split_once('\n').map_or("", |(_, body)| body);
        text = text.trim_end().strip_suffix("```").unwrap_or(text).trim();
    }
    for (open, close) in [("\"\"\"", "\"\"\""), ("/**", "*/"), ("/*", "*/"), ("<!--", "-->")] {
        if text.len() >= open.len() + close.len()
            && let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close))
        {
            text = inner.trim();
            break;
        }
    }

    let mut lines: Vec<String> = text
        .lines()
        .map(|line| strip_marker(line.trim_end(), style).to_string())
        .collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }

    if lines.is_empty() {
        return Err(invalid("generated text is empty").into());
    }
    if let Some(close) = style.closing_delimiter()
        && lines.iter().any(|l| l.contains(close))
    {
        return Err(invalid("generated text contains the closing doc delimiter").into());
    }
    if lines.iter().any(|l| l.contains('\0')) {
        return Err(invalid("generated text contains NUL bytes").into());
    }

    Ok(lines)
}

/// Drop a leading per-line comment marker the model may have echoed
fn strip_marker(line: &str, style: BlockStyle) -> &str {
    let trimmed = line.trim_start();
    let markers: &[&str] = match style {
        BlockStyle::RustOuter => &["///"],
        BlockStyle::RustInner => &["//!"],
        BlockStyle::HashComment => &["#"],
        BlockStyle::JsDoc | BlockStyle::CssBlock => &["*"],
        BlockStyle::Docstring | BlockStyle::HtmlComment => &[],
    };
    markers
        .iter()
        .find_map(|m| trimmed.strip_prefix(m))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .unwrap_or(line)
}
