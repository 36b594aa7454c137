//! Comment Analyzer Module
//!
//! Finds documentable constructs in a source unit and scores how many of
//! them carry documentation:
//! - Per-language lexical rules held as data ([`rules`])
//! - Single-pass detection with comment/string tracking
//! - Body metrics (complexity, return values, class members)
//! - Directory walking for coverage summaries ([`scanner`])

pub mod construct;
mod detect;
pub mod language;
mod metrics;
pub mod rules;
pub mod scanner;
mod signature;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::analysis::DEFAULT_COMPLEXITY_THRESHOLD;
use crate::types::{DocError, Result};

pub use construct::{Construct, ConstructKind, DocSpan};
pub use language::{DocPlacement, Language, LanguageFamily};
pub use scanner::{FileScanner, ScannedFile};

use detect::Scanner;
use metrics::Metrics;

// =============================================================================
// Source Unit
// =============================================================================

/// Full text of one file plus its language. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    text: String,
    language: Language,
    name: Option<String>,
}

impl SourceUnit {
    /// Wrap already-decoded text. Text containing NUL bytes or CR-only line
    /// breaks is rejected.
    pub fn new(text: impl Into<String>, language: Language) -> Result<Self> {
        let text = text.into();
        if text.contains('\0') {
            return Err(DocError::malformed("content contains NUL bytes"));
        }
        if text
            .match_indices('\r')
            .any(|(pos, _)| !text[pos + 1..].starts_with('\n'))
        {
            return Err(DocError::malformed(
                "content uses bare carriage returns as line breaks",
            ));
        }
        Ok(Self {
            text,
            language,
            name: None,
        })
    }

    /// Decode raw file content as UTF-8
    pub fn from_bytes(bytes: Vec<u8>, language: Language) -> Result<Self> {
        let text = String::from_utf8(bytes)
            .map_err(|e| DocError::malformed(format!("content is not valid UTF-8 ({})", e.utf8_error())))?;
        Self::new(text, language)
    }

    /// Read a file, detecting the language from its extension unless given
    pub fn from_path(path: &Path, language: Option<Language>) -> Result<Self> {
        let language = match language {
            Some(lang) => lang,
            None => Language::from_path(path)?,
        };
        let bytes = std::fs::read(path)?;
        let unit = Self::from_bytes(bytes, language)?;
        Ok(match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => unit.with_name(stem),
            None => unit,
        })
    }

    /// Name used for module header summaries (usually the file stem)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lines without terminators; a leading byte-order mark is ignored
    pub(crate) fn lines(&self) -> Vec<&str> {
        let text = self.text.strip_prefix('\u{feff}').unwrap_or(&self.text);
        text.lines().collect()
    }
}

// =============================================================================
// Options & Report
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    /// Treat the top of the file as a documentable module header
    pub module_header: bool,
    pub complexity_threshold: u32,
    pub inline_suggestions: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            module_header: false,
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
            inline_suggestions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexFunction {
    pub name: String,
    pub line: usize,
    pub complexity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSuggestion {
    pub line: usize,
    pub message: String,
}

/// Result of analyzing one source unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub language: Language,
    pub constructs: Vec<Construct>,
    pub total: usize,
    pub documented: usize,
    /// `documented / total`, 1.0 for a unit without constructs
    pub coverage: f64,
    #[serde(default)]
    pub complex_functions: Vec<ComplexFunction>,
    #[serde(default)]
    pub inline_suggestions: Vec<InlineSuggestion>,
}

impl AnalysisReport {
    fn new(language: Language, constructs: Vec<Construct>) -> Self {
        let total = constructs.len();
        let documented = constructs.iter().filter(|c| c.has_doc).count();
        Self {
            language,
            constructs,
            total,
            documented,
            coverage: coverage_ratio(documented, total),
            complex_functions: Vec::new(),
            inline_suggestions: Vec::new(),
        }
    }

    pub fn undocumented(&self) -> impl Iterator<Item = &Construct> {
        self.constructs.iter().filter(|c| !c.has_doc)
    }

    pub fn is_fully_documented(&self) -> bool {
        self.documented == self.total
    }
}

/// Coverage ratio with the empty case defined as fully covered
pub fn coverage_ratio(documented: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        documented as f64 / total as f64
    }
}

// =============================================================================
// Analyzer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CommentAnalyzer {
    options: AnalyzerOptions,
}

impl CommentAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn analyze(&self, source: &SourceUnit) -> AnalysisReport {
        let language = source.language();
        let lines = source.lines();

        let scan = Scanner::new(&lines, language).scan(self.options.module_header, source.name());
        let mut detected = scan.detected;
        let metrics = Metrics::new(&lines, &scan.classes, language);
        metrics.enrich(&mut detected);

        let constructs: Vec<Construct> = detected.into_iter().map(|d| d.construct).collect();
        for c in &constructs {
            debug!(kind = %c.kind, name = %c.name, line = c.line, has_doc = c.has_doc, "construct");
        }

        let mut report = AnalysisReport::new(language, constructs);

        report.complex_functions = report
            .constructs
            .iter()
            .filter_map(|c| {
                c.complexity
                    .filter(|&n| n > self.options.complexity_threshold)
                    .map(|complexity| ComplexFunction {
                        name: c.name.clone(),
                        line: c.line,
                        complexity,
                    })
            })
            .collect();

        if self.options.inline_suggestions {
            report.inline_suggestions = metrics
                .inline_suggestions()
                .into_iter()
                .map(|(line, message)| InlineSuggestion {
                    line,
                    message: message.to_string(),
                })
                .collect();
        }

        report
    }
}

/// Analyze text with default options
pub fn analyze(text: &str, language: Language) -> Result<AnalysisReport> {
    let source = SourceUnit::new(text, language)?;
    Ok(CommentAnalyzer::default().analyze(&source))
}

/// Analyze text whose language is given as a file extension
pub fn analyze_with_extension(text: &str, extension: &str) -> Result<AnalysisReport> {
    let language = Language::from_extension(extension)?;
    analyze(text, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_undocumented_function() {
        let report = analyze("def foo():\n    pass\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.documented, 0);
        assert_eq!(report.coverage, 0.0);

        let c = &report.constructs[0];
        assert_eq!(c.kind, ConstructKind::Function);
        assert_eq!(c.name, "foo");
        assert_eq!(c.line, 1);
        assert!(!c.has_doc);
    }

    #[test]
    fn test_documented_function() {
        let report =
            analyze("def foo():\n    \"\"\"Does a thing.\"\"\"\n    pass\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
        assert!(report.constructs[0].has_doc);
        assert_eq!(report.coverage, 1.0);
        assert_eq!(
            report.constructs[0].doc.as_ref().map(|d| d.text.as_str()),
            Some("\"\"\"Does a thing.\"\"\"")
        );
    }

    #[test]
    fn test_empty_input() {
        let report = analyze("", Language::Python).unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(report.coverage, 1.0);
        assert!(report.is_fully_documented());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = analyze_with_extension("\u{1}\u{2}", "bin").unwrap_err();
        assert!(matches!(err, DocError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn test_malformed_input() {
        let err = SourceUnit::from_bytes(vec![0x66, 0xff, 0xfe], Language::Python).unwrap_err();
        assert!(matches!(err, DocError::MalformedInput { .. }));

        let err = analyze("def f():\0", Language::Python).unwrap_err();
        assert!(matches!(err, DocError::MalformedInput { .. }));

        let err = analyze("def a():\r    pass\rdef b():\r    pass\r", Language::Python)
            .unwrap_err();
        assert!(matches!(err, DocError::MalformedInput { .. }));

        let report = analyze("def a():\r\n    pass\r\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_comment_quotes_do_not_open_strings() {
        let report = analyze("x = 1  # use \"\"\" for docs\ndef foo():\n    pass\n", Language::Python)
            .unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.constructs[0].name, "foo");

        let report = analyze("q = \"'''\"\ndef foo():\n    pass\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_fstring_body_is_not_a_docstring() {
        let report = analyze("def f():\n    f\"\"\"not a doc\"\"\"\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
        assert!(!report.constructs[0].has_doc);
    }

    #[test]
    fn test_byte_order_mark_ignored() {
        let report = analyze("\u{feff}def foo():\n    pass\n", Language::Python).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.constructs[0].line, 1);
    }

    #[test]
    fn test_complex_functions_reported() {
        let src = "\
def tangled(x):
    if x:
        pass
    if x:
        pass
    for i in x:
        pass
    while x:
        pass
    try:
        pass
    except Exception:
        pass
";
        let source = SourceUnit::new(src, Language::Python).unwrap();
        let report = CommentAnalyzer::default().analyze(&source);
        assert_eq!(
            report.complex_functions,
            vec![ComplexFunction {
                name: "tangled".to_string(),
                line: 1,
                complexity: 6,
            }]
        );

        let strict = CommentAnalyzer::new(AnalyzerOptions {
            complexity_threshold: 10,
            ..Default::default()
        });
        assert!(strict.analyze(&source).complex_functions.is_empty());
    }

    #[test]
    fn test_inline_suggestions_toggle() {
        let src = "function f(xs) {\n  for (const x of xs) {}\n}\n";
        let source = SourceUnit::new(src, Language::JavaScript).unwrap();

        let report = CommentAnalyzer::default().analyze(&source);
        assert_eq!(report.inline_suggestions.len(), 1);
        assert_eq!(report.inline_suggestions[0].line, 2);

        let quiet = CommentAnalyzer::new(AnalyzerOptions {
            inline_suggestions: false,
            ..Default::default()
        });
        assert!(quiet.analyze(&source).inline_suggestions.is_empty());
    }

    #[test]
    fn test_module_header_counts_toward_coverage() {
        let source = SourceUnit::new("import os\n\ndef f():\n    \"\"\"F.\"\"\"\n", Language::Python)
            .unwrap()
            .with_name("tool");
        let analyzer = CommentAnalyzer::new(AnalyzerOptions {
            module_header: true,
            ..Default::default()
        });
        let report = analyzer.analyze(&source);
        assert_eq!(report.total, 2);
        assert_eq!(report.documented, 1);
        assert_eq!(report.constructs[0].kind, ConstructKind::ModuleHeader);
        assert_eq!(report.constructs[0].name, "tool");
    }

    #[test]
    fn test_json_report_shape() {
        let report = analyze(".btn {\n}\n", Language::Css).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["language"], "css");
        assert_eq!(json["total"], 1);
        assert_eq!(json["constructs"][0]["kind"], "rule");
    }

    fn source_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("def f(a):".to_string()),
            Just("class K:".to_string()),
            Just("    \"\"\"Doc.\"\"\"".to_string()),
            Just("\"\"\"".to_string()),
            Just("# note".to_string()),
            Just("function g() {".to_string()),
            Just("/** doc */".to_string()),
            Just("/*".to_string()),
            Just("*/".to_string()),
            Just("}".to_string()),
            Just(String::new()),
            "[ a-z(){}:#\"'/*]{0,24}",
        ]
    }

    fn any_language() -> impl Strategy<Value = Language> {
        prop::sample::select(Language::all_variants().to_vec())
    }

    proptest! {
        #[test]
        fn prop_documented_never_exceeds_total(
            lines in prop::collection::vec(source_line(), 0..40),
            language in any_language(),
        ) {
            let text = lines.join("\n");
            let report = analyze(&text, language).unwrap();
            prop_assert!(report.documented <= report.total);
            prop_assert_eq!(report.total, report.constructs.len());
            if report.total == 0 {
                prop_assert_eq!(report.coverage, 1.0);
            }
            let mut prev = 0;
            for c in &report.constructs {
                prop_assert!(c.line > prev);
                prev = c.line;
            }
        }

        #[test]
        fn prop_analysis_is_deterministic(
            lines in prop::collection::vec(source_line(), 0..40),
            language in any_language(),
        ) {
            let text = lines.join("\n");
            let first = analyze(&text, language).unwrap();
            let second = analyze(&text, language).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
