//! Documentation Improver
//!
//! Inserts a doc block for every undocumented construct an analysis finds.
//! Existing lines are never altered or reordered: the output is the input
//! with whole lines added. Text comes from an optional [`DocGenerator`],
//! falling back to the name-derived template.

pub mod format;
pub mod generator;
pub mod stub;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyzer::{
    AnalyzerOptions, CommentAnalyzer, Construct, ConstructKind, Language, SourceUnit,
};
use crate::constants::generation::CONTEXT_LINES;
use crate::types::Result;

pub use format::BlockStyle;
pub use generator::{DocGenerator, GenerationRequest};

/// Where an inserted block's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSource {
    Template,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovedConstruct {
    pub construct: Construct,
    pub source: DocSource,
    /// 1-based line of the inserted block in the modified text
    pub inserted_line: usize,
    pub inserted_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementResult {
    pub original: String,
    pub modified: String,
    pub improved: Vec<ImprovedConstruct>,
}

impl ImprovementResult {
    pub fn is_changed(&self) -> bool {
        !self.improved.is_empty()
    }

    pub fn generated_count(&self) -> usize {
        self.improved
            .iter()
            .filter(|i| i.source == DocSource::Generated)
            .count()
    }
}

struct Insertion {
    /// 0-based index of the original line the block goes above
    at: usize,
    improved: usize,
    lines: Vec<String>,
}

#[derive(Default)]
pub struct Improver {
    analyzer: CommentAnalyzer,
    generator: Option<Box<dyn DocGenerator>>,
}

impl Improver {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            analyzer: CommentAnalyzer::new(options),
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn DocGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn improve(&self, source: &SourceUnit) -> ImprovementResult {
        let report = self.analyzer.analyze(source);
        let language = source.language();
        let lines = source.lines();

        let mut improved = Vec::new();
        let mut insertions = Vec::new();

        for construct in report.undocumented() {
            let style = BlockStyle::for_construct(language, construct);
            let (at, indent) = if style == BlockStyle::Docstring
                && construct.kind != ConstructKind::ModuleHeader
            {
                (
                    construct.signature_end,
                    format::python_body_indent(&lines, construct),
                )
            } else {
                (construct.line - 1, construct.indent.clone())
            };

            let (body, doc_source) = self.doc_body(construct, language, style, &lines);
            debug!(name = %construct.name, line = construct.line, source = ?doc_source, "Inserting doc block");

            insertions.push(Insertion {
                at,
                improved: improved.len(),
                lines: style.render(&indent, &body),
            });
            improved.push(ImprovedConstruct {
                construct: construct.clone(),
                source: doc_source,
                inserted_line: 0,
                inserted_lines: 0,
            });
        }

        insertions.sort_by_key(|i| i.at);
        let modified = splice(source.text(), &insertions, &mut improved);

        ImprovementResult {
            original: source.text().to_string(),
            modified,
            improved,
        }
    }

    fn doc_body(
        &self,
        construct: &Construct,
        language: Language,
        style: BlockStyle,
        lines: &[&str],
    ) -> (Vec<String>, DocSource) {
        let template = || scrub(stub::template(construct, language), style);

        let Some(generator) = &self.generator else {
            return (template(), DocSource::Template);
        };

        let request = GenerationRequest {
            kind: construct.kind,
            name: &construct.name,
            language,
            context: context(lines, construct.line - 1),
        };

        match generator
            .generate(&request)
            .and_then(|text| generator::sanitize(&text, style, generator.name()))
        {
            Ok(body) => (body, DocSource::Generated),
            Err(e) => {
                warn!(
                    generator = generator.name(),
                    construct = %construct.name,
                    error = %e,
                    "Generation failed, using template"
                );
                (template(), DocSource::Template)
            }
        }
    }
}

/// Remove a closing delimiter that a construct name smuggled into the template
fn scrub(body: Vec<String>, style: BlockStyle) -> Vec<String> {
    match style.closing_delimiter() {
        Some(close) => body.into_iter().map(|l| l.replace(close, "")).collect(),
        None => body,
    }
}

fn context(lines: &[&str], index: usize) -> String {
    let start = index.saturating_sub(CONTEXT_LINES / 2);
    let end = (index + CONTEXT_LINES).min(lines.len());
    lines[start..end].join("\n")
}

/// Rebuild the text with blocks inserted, keeping every original line and
/// its terminator untouched
fn splice(text: &str, insertions: &[Insertion], improved: &mut [ImprovedConstruct]) -> String {
    if insertions.is_empty() {
        return text.to_string();
    }

    let eol = format::line_ending(text);
    let (bom, body) = match text.strip_prefix('\u{feff}') {
        Some(rest) => ("\u{feff}", rest),
        None => ("", text),
    };
    let pieces: Vec<&str> = body.split_inclusive('\n').collect();

    let extra: usize = insertions.iter().map(|i| i.lines.len()).sum();
    let mut out = String::with_capacity(text.len() + extra * 40);
    out.push_str(bom);

    let mut next = insertions.iter().peekable();
    let mut out_line = 0;

    for index in 0..=pieces.len() {
        while let Some(ins) = next.next_if(|i| i.at == index) {
            if index == pieces.len() && !out.is_empty() && !out.ends_with('\n') {
                out.push_str(eol);
            }
            improved[ins.improved].inserted_line = out_line + 1;
            improved[ins.improved].inserted_lines = ins.lines.len();
            for line in &ins.lines {
                out.push_str(line);
                out.push_str(eol);
            }
            out_line += ins.lines.len();
        }
        if let Some(piece) = pieces.get(index) {
            out.push_str(piece);
            out_line += 1;
        }
    }

    out
}

/// Improve text with default options and the template generator
pub fn improve(text: &str, language: Language) -> Result<ImprovementResult> {
    let source = SourceUnit::new(text, language)?;
    Ok(Improver::default().improve(&source))
}
