//! Documentable constructs found in a source unit.

use serde::{Deserialize, Serialize};

/// Kind of documentable construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    Function,
    Class,
    ModuleHeader,
    Section,
    Rule,
}

impl ConstructKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::ModuleHeader => "module_header",
            Self::Section => "section",
            Self::Rule => "rule",
        }
    }
}

impl std::fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Existing documentation attached to a construct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSpan {
    /// 1-based first line of the comment or docstring
    pub start_line: usize,
    /// 1-based last line (inclusive)
    pub end_line: usize,
    pub text: String,
}

/// A declaration that can carry documentation.
///
/// `line` is the 1-based line of the declaration itself (for HTML sections,
/// the line holding the opening tag; for module headers, the first content
/// line after any preamble).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construct {
    pub kind: ConstructKind,
    pub name: String,
    /// Declaring keyword (`def`, `fn`, `struct`, `interface`, `div`, ...)
    pub keyword: String,
    pub line: usize,
    /// Last line of the declaration header (multi-line parameter lists)
    pub signature_end: usize,
    /// Leading whitespace of the declaration line
    #[serde(skip)]
    pub indent: String,
    pub has_doc: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<DocSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub returns_value: bool,
    /// Method names declared directly in a class body
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    /// Body sits on the header line (`def f(): pass`)
    #[serde(skip)]
    pub inline_body: bool,
}

impl Construct {
    pub(crate) fn new(kind: ConstructKind, name: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            keyword: String::new(),
            line,
            signature_end: line,
            indent: String::new(),
            has_doc: false,
            doc: None,
            params: Vec::new(),
            returns_value: false,
            members: Vec::new(),
            complexity: None,
            inline_body: false,
        }
    }

    pub(crate) fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub(crate) fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub(crate) fn documented_by(mut self, doc: Option<DocSpan>) -> Self {
        self.has_doc = doc.is_some();
        self.doc = doc;
        self
    }
}
