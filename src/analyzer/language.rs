//! Language Detection Module
//!
//! **Single source of truth** for language detection across the crate.
//! The supported set is closed: every variant carries its extensions, aliases
//! and documentation placement as data, and an extension outside the table is
//! an [`DocError::UnsupportedLanguage`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use doccov::analyzer::language::Language;
//!
//! let lang = Language::from_path("src/main.rs")?;
//! assert_eq!(lang, Language::Rust);
//! assert_eq!(lang.tag(), "rust");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DocError, Result};

// =============================================================================
// Language Metadata Table - Single Source of Truth
// =============================================================================

/// Where a language expects documentation relative to the declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPlacement {
    /// Comment block on the lines directly above the declaration
    Above,
    /// String literal as the first statement of the body (Python docstrings)
    Below,
}

/// Broad family of the file, used by report rendering and header summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    Source,
    Markup,
    Stylesheet,
}

/// Language metadata entry containing all language-specific information
struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Lowercase identifier used in reports and config
    tag: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Alternative names for parsing from string
    aliases: &'static [&'static str],
    placement: DocPlacement,
    family: LanguageFamily,
}

/// Macro to define language metadata concisely
macro_rules! lang_meta {
    ($display:literal, $tag:literal, [$($ext:literal),*], [$($alias:literal),*], $placement:ident, $family:ident) => {
        LanguageMeta {
            display_name: $display,
            tag: $tag,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            placement: DocPlacement::$placement,
            family: LanguageFamily::$family,
        }
    };
}

impl Language {
    /// Get metadata for this language variant
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Python => lang_meta!("Python", "python", ["py", "pyi", "pyw"], ["python", "py"], Below, Source),
            Language::JavaScript => lang_meta!("JavaScript", "javascript", ["js", "mjs", "cjs", "jsx"], ["javascript", "js", "jsx"], Above, Source),
            Language::TypeScript => lang_meta!("TypeScript", "typescript", ["ts", "mts", "cts", "tsx"], ["typescript", "ts", "tsx"], Above, Source),
            Language::Rust => lang_meta!("Rust", "rust", ["rs"], ["rust", "rs"], Above, Source),
            Language::Html => lang_meta!("HTML", "html", ["html", "htm"], ["html", "htm"], Above, Markup),
            Language::Css => lang_meta!("CSS", "css", ["css"], ["css"], Above, Stylesheet),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages the comment analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Html,
    Css,
}

impl Language {
    /// Display name (human-readable)
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Lowercase identifier (`python`, `rust`, ...)
    pub fn tag(&self) -> &'static str {
        self.meta().tag
    }

    pub fn placement(&self) -> DocPlacement {
        self.meta().placement
    }

    pub fn family(&self) -> LanguageFamily {
        self.meta().family
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext_lower = ext.to_lowercase();

        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.contains(&ext_lower.as_str()))
            .ok_or_else(|| DocError::unsupported(ext_lower))
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Err(DocError::unsupported(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )),
        }
    }

    /// Every extension the analyzer accepts
    pub fn supported_extensions() -> Vec<&'static str> {
        Self::all_variants()
            .iter()
            .flat_map(|lang| lang.meta().extensions.iter().copied())
            .collect()
    }

    /// Get all language variants for iteration
    pub fn all_variants() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Rust,
            Language::Html,
            Language::Css,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        let s_lower = s.to_lowercase();

        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().aliases.contains(&s_lower.as_str()))
            .ok_or_else(|| DocError::unsupported(s_lower))
    }
}
