//! Per-language lexical rules.
//!
//! Everything the scanner needs to know about a language lives here as data:
//! declaration patterns, comment delimiters, what counts as a doc comment,
//! branch keywords for complexity, and inline-comment suggestion patterns.
//! Patterns are compiled once on first use.

use std::sync::LazyLock;

use regex::Regex;

use super::construct::ConstructKind;
use super::language::Language;

/// Declaration pattern. Every pattern exposes a `name` group and may expose
/// `kw` (declaring keyword) and `single` (arrow parameter without parens).
pub struct DeclRule {
    pub kind: ConstructKind,
    pub pattern: Regex,
}

/// Block comment delimiters
pub struct BlockComment {
    pub open: &'static str,
    pub close: &'static str,
    /// Marker right after `open` that makes the comment documentation
    /// (`/**`). `None` means every block comment documents.
    pub doc_marker: Option<&'static str>,
}

impl BlockComment {
    /// Whether a comment whose text after `open` is `rest` documents
    pub fn is_doc(&self, rest: &str) -> bool {
        match self.doc_marker {
            None => true,
            Some(marker) => rest.starts_with(marker),
        }
    }
}

/// Line doc comment prefix, e.g. `///` but not `////`
pub struct LineDoc {
    pub prefix: &'static str,
    pub excluded: Option<&'static str>,
}

impl LineDoc {
    pub fn matches(&self, trimmed: &str) -> bool {
        trimmed.starts_with(self.prefix)
            && !self.excluded.is_some_and(|ex| trimmed.starts_with(ex))
    }
}

pub struct LanguageRules {
    pub declarations: Vec<DeclRule>,
    pub block_comment: Option<BlockComment>,
    pub line_comment: Option<&'static str>,
    pub line_doc: Option<LineDoc>,
    /// Lines between a doc comment and its declaration (decorators, attributes)
    pub attribute: Option<Regex>,
    /// Prefixes of a first content line that document the module
    pub header_markers: &'static [&'static str],
    /// Branch keywords counted for cyclomatic complexity
    pub branch: Option<Regex>,
    /// A `return` carrying a value
    pub returns: Option<Regex>,
    pub inline: Vec<(Regex, &'static str)>,
    /// Characters that open a string literal (for bracket matching)
    pub quotes: &'static [char],
    /// Treat `<...>` as nesting inside signatures (generics)
    pub track_angles: bool,
    /// Delimiters of string literals that may span lines (Python triple
    /// quotes, JS template literals)
    pub string_blocks: &'static [&'static str],
}

impl LanguageRules {
    /// First declaration matching the line, in rule order
    pub fn match_declaration<'a>(&self, line: &'a str) -> Option<(ConstructKind, regex::Captures<'a>)> {
        self.declarations
            .iter()
            .find_map(|rule| rule.pattern.captures(line).map(|caps| (rule.kind, caps)))
    }

    pub fn is_attribute(&self, line: &str) -> bool {
        self.attribute.as_ref().is_some_and(|re| re.is_match(line))
    }

    pub fn is_line_comment(&self, trimmed: &str) -> bool {
        self.line_comment.is_some_and(|p| trimmed.starts_with(p))
    }

    pub fn is_line_doc(&self, trimmed: &str) -> bool {
        self.line_doc.as_ref().is_some_and(|d| d.matches(trimmed))
    }

    pub fn count_branches(&self, code: &str) -> u32 {
        self.branch
            .as_ref()
            .map(|re| re.find_iter(code).count() as u32)
            .unwrap_or(0)
    }

    pub fn has_return_value(&self, code: &str) -> bool {
        self.returns.as_ref().is_some_and(|re| re.is_match(code))
    }

    /// First inline suggestion whose pattern matches the code line
    pub fn inline_suggestion(&self, code: &str) -> Option<&'static str> {
        self.inline
            .iter()
            .find(|(re, _)| re.is_match(code))
            .map(|(_, msg)| *msg)
    }

    pub fn is_header_doc(&self, trimmed: &str) -> bool {
        self.header_markers.iter().any(|m| trimmed.starts_with(m))
    }
}

/// Rules for a language
pub fn rules(language: Language) -> &'static LanguageRules {
    match language {
        Language::Python => &PYTHON,
        Language::JavaScript => &JAVASCRIPT,
        Language::TypeScript => &TYPESCRIPT,
        Language::Rust => &RUST,
        Language::Html => &HTML,
        Language::Css => &CSS,
    }
}

/// Lines that precede the module header: shebang, encoding cookie, doctype
pub fn is_preamble(language: Language, index: usize, line: &str) -> bool {
    let trimmed = line.trim_start();
    match language {
        Language::Python => {
            (index == 0 && trimmed.starts_with("#!")) || (index < 2 && RE_CODING.is_match(line))
        }
        Language::JavaScript | Language::TypeScript | Language::Rust => {
            index == 0 && trimmed.starts_with("#!") && !trimmed.starts_with("#![")
        }
        Language::Html => index == 0 && RE_DOCTYPE.is_match(trimmed),
        Language::Css => index == 0 && trimmed.starts_with("@charset"),
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

fn decl(kind: ConstructKind, pattern: &str) -> DeclRule {
    DeclRule {
        kind,
        pattern: compile(pattern),
    }
}

static RE_CODING: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ \t\f]*#.*?coding[:=]"));
static RE_DOCTYPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^<!doctype\b"));

// =============================================================================
// Python
// =============================================================================

static PYTHON: LazyLock<LanguageRules> = LazyLock::new(|| LanguageRules {
    declarations: vec![
        decl(
            ConstructKind::Function,
            r"^\s*(?:async\s+)?(?P<kw>def)\s+(?P<name>[A-Za-z_]\w*)\s*[\(\[]",
        ),
        decl(
            ConstructKind::Class,
            r"^\s*(?P<kw>class)\s+(?P<name>[A-Za-z_]\w*)\s*[\(:\[]",
        ),
    ],
    block_comment: None,
    line_comment: Some("#"),
    line_doc: Some(LineDoc {
        prefix: "#",
        excluded: None,
    }),
    attribute: Some(compile(r"^\s*@[A-Za-z_]")),
    header_markers: &[
        "\"", "'", "#", "r\"", "r'", "u\"", "u'", "R\"", "R'", "U\"", "U'",
    ],
    branch: Some(compile(r"^\s*(?:if|elif|for|while|try)\b")),
    returns: Some(compile(r"\breturn\s+[^\s#;]")),
    inline: vec![
        (compile(r"^\s*for\s+\w+(?:\s*,\s*\w+)*\s+in\b"), "Loop through items"),
        (compile(r"^\s*(?:el)?if\s+.+\s+and\s+.+:"), "Check multiple conditions"),
        (compile(r"^\s*try\s*:"), "Handle potential errors"),
        (compile(r"^\s*except\s+\w+(?:\s+as\s+\w+)?\s*:"), "Catch specific exception"),
        (compile(r"^\s*(?:async\s+)?with\s+.+\s+as\s+\w+\s*:"), "Manage context"),
        (compile(r"^\s*while\s+.+:"), "Continue until condition is met"),
    ],
    quotes: &['"', '\''],
    track_angles: false,
    string_blocks: &["\"\"\"", "'''"],
});

// =============================================================================
// JavaScript / TypeScript
// =============================================================================

const JS_FUNCTION: &str = r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?(?P<kw>function)\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)";
const JS_FUNCTION_EXPR: &str = r"^\s*(?:export\s+)?(?P<kw>const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=]*)?=\s*(?:async\s+)?function\b";
const JS_ARROW: &str = r"^\s*(?:export\s+)?(?P<kw>const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=]*)?=\s*(?:async\s+)?(?:\([^)]*\)\s*(?::\s*[^=]+?)?\s*=>|\([^)]*$|(?P<single>[A-Za-z_$][\w$]*)\s*=>)";
const JS_CLASS: &str = r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?P<kw>class)\s+(?P<name>[A-Za-z_$][\w$]*)";
const TS_INTERFACE: &str =
    r"^\s*(?:export\s+)?(?:declare\s+)?(?P<kw>interface)\s+(?P<name>[A-Za-z_$][\w$]*)";

fn js_rules(typescript: bool) -> LanguageRules {
    let mut declarations = vec![
        decl(ConstructKind::Function, JS_FUNCTION),
        decl(ConstructKind::Function, JS_FUNCTION_EXPR),
        decl(ConstructKind::Function, JS_ARROW),
        decl(ConstructKind::Class, JS_CLASS),
    ];
    if typescript {
        declarations.push(decl(ConstructKind::Class, TS_INTERFACE));
    }

    LanguageRules {
        declarations,
        block_comment: Some(BlockComment {
            open: "/*",
            close: "*/",
            doc_marker: Some("*"),
        }),
        line_comment: Some("//"),
        line_doc: None,
        attribute: Some(compile(r"^\s*@[A-Za-z_$]")),
        header_markers: &["/*", "//"],
        branch: Some(compile(r"\b(?:if|for|while|try)\b")),
        returns: Some(compile(r"\breturn\s+[^\s;]")),
        inline: vec![
            (compile(r"\bfor\s*\(.*;.*;.*\)"), "Loop with counter"),
            (compile(r"\bfor\s*\(.+\s+of\s+.+\)"), "Loop through items"),
            (compile(r"\bif\s*\(.+&&.+\)"), "Check multiple conditions"),
            (compile(r"\btry\s*\{"), "Handle potential errors"),
            (compile(r"\bcatch\s*\(.+\)"), "Catch exceptions"),
            (compile(r"\bwhile\s*\(.+\)"), "Continue until condition is met"),
        ],
        quotes: &['"', '\'', '`'],
        track_angles: typescript,
        string_blocks: &["`"],
    }
}

static JAVASCRIPT: LazyLock<LanguageRules> = LazyLock::new(|| js_rules(false));
static TYPESCRIPT: LazyLock<LanguageRules> = LazyLock::new(|| js_rules(true));

// =============================================================================
// Rust
// =============================================================================

static RUST: LazyLock<LanguageRules> = LazyLock::new(|| LanguageRules {
    declarations: vec![
        decl(
            ConstructKind::Function,
            r#"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+(?:"[^"]*"\s+)?)?(?P<kw>fn)\s+(?P<name>[A-Za-z_]\w*)"#,
        ),
        decl(
            ConstructKind::Class,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:unsafe\s+)?(?P<kw>struct|enum|trait|union)\s+(?P<name>[A-Za-z_]\w*)",
        ),
    ],
    block_comment: Some(BlockComment {
        open: "/*",
        close: "*/",
        doc_marker: Some("*"),
    }),
    line_comment: Some("//"),
    line_doc: Some(LineDoc {
        prefix: "///",
        excluded: Some("////"),
    }),
    attribute: Some(compile(r"^\s*#\[")),
    header_markers: &["//!", "/*!"],
    branch: Some(compile(r"\b(?:if|for|while|loop|match)\b")),
    returns: None,
    inline: Vec::new(),
    quotes: &['"'],
    track_angles: true,
    string_blocks: &[],
});

// =============================================================================
// HTML / CSS
// =============================================================================

const HTML_LANDMARKS: &str = "div|section|header|footer|nav|main|article|aside";

static HTML: LazyLock<LanguageRules> = LazyLock::new(|| LanguageRules {
    declarations: vec![
        decl(
            ConstructKind::Section,
            &format!(
                r#"(?i)<(?P<kw>{HTML_LANDMARKS})\b[^>]*?\bid\s*=\s*["'](?P<name>[^"']+)["']"#
            ),
        ),
        decl(
            ConstructKind::Section,
            &format!(
                r#"(?i)<(?P<kw>{HTML_LANDMARKS})\b[^>]*?\bclass\s*=\s*["'](?P<name>[^"']+)["']"#
            ),
        ),
    ],
    block_comment: Some(BlockComment {
        open: "<!--",
        close: "-->",
        doc_marker: None,
    }),
    line_comment: None,
    line_doc: None,
    attribute: None,
    header_markers: &["<!--"],
    branch: None,
    returns: None,
    inline: Vec::new(),
    quotes: &[],
    track_angles: false,
    string_blocks: &[],
});

static CSS: LazyLock<LanguageRules> = LazyLock::new(|| LanguageRules {
    declarations: vec![decl(
        ConstructKind::Rule,
        r"^\s*(?P<name>[.#:\[*A-Za-z_][^{};/]*?)\s*\{",
    )],
    block_comment: Some(BlockComment {
        open: "/*",
        close: "*/",
        doc_marker: None,
    }),
    line_comment: None,
    line_doc: None,
    attribute: None,
    header_markers: &["/*"],
    branch: None,
    returns: None,
    inline: Vec::new(),
    quotes: &['"', '\''],
    track_angles: false,
    string_blocks: &[],
});
