//! Single-pass construct detection.
//!
//! Lines are visited once, top to bottom. The scanner tracks whether it is
//! inside a block comment or a multi-line string so declarations quoted in
//! docs are never reported, and records every comment span it closes so the
//! "documented?" question is a lookup against the most recent span.

use super::construct::{Construct, ConstructKind, DocSpan};
use super::language::{DocPlacement, Language};
use super::rules::{LanguageRules, is_preamble, rules};
use super::signature::{
    ParamsEnd, code_part, indent_of, mask_strings, parameters, python_header_end,
    python_inline_body, starts_with_docstring, starts_with_string,
};

/// What a line holds once comments and strings are accounted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Code,
    Comment,
    /// Inside (or opening) a multi-line string literal
    Text,
}

#[derive(Debug, Clone, Copy)]
struct CommentSpan {
    start: usize,
    end: usize,
    is_doc: bool,
}

#[derive(Debug, Clone, Copy)]
enum Region {
    Code,
    Block {
        close: &'static str,
        start: usize,
        is_doc: bool,
    },
    Text {
        delim: &'static str,
    },
}

/// A construct plus the positions later passes need
#[derive(Debug, Clone)]
pub struct Detected {
    pub construct: Construct,
    /// Byte offset just past the construct name on its line
    pub name_end: usize,
    pub params_end: Option<ParamsEnd>,
}

#[derive(Debug)]
pub struct Scan {
    pub detected: Vec<Detected>,
    pub classes: Vec<LineClass>,
}

pub struct Scanner<'a> {
    lines: &'a [&'a str],
    language: Language,
    rules: &'static LanguageRules,
    spans: Vec<CommentSpan>,
}

impl<'a> Scanner<'a> {
    pub fn new(lines: &'a [&'a str], language: Language) -> Self {
        Self {
            lines,
            language,
            rules: rules(language),
            spans: Vec::new(),
        }
    }

    pub fn scan(mut self, module_header: bool, source_name: Option<&str>) -> Scan {
        let mut classes = Vec::with_capacity(self.lines.len());
        let mut detected = Vec::new();
        let mut region = Region::Code;

        for (idx, line) in self.lines.iter().enumerate() {
            match region {
                Region::Block {
                    close,
                    start,
                    is_doc,
                } => {
                    classes.push(LineClass::Comment);
                    if line.contains(close) {
                        self.spans.push(CommentSpan {
                            start,
                            end: idx,
                            is_doc,
                        });
                        region = Region::Code;
                    }
                    continue;
                }
                Region::Text { delim } => {
                    classes.push(LineClass::Text);
                    if closes_literal(line, delim) {
                        region = Region::Code;
                    }
                    continue;
                }
                Region::Code => {}
            }

            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                classes.push(LineClass::Blank);
                continue;
            }

            if self.rules.is_line_comment(trimmed) {
                classes.push(LineClass::Comment);
                self.record_line_comment(idx, self.rules.is_line_doc(trimmed));
                continue;
            }

            if let Some(block) = &self.rules.block_comment
                && let Some(rest) = trimmed.strip_prefix(block.open)
            {
                classes.push(LineClass::Comment);
                let is_doc = block.is_doc(rest);
                if rest.contains(block.close) {
                    self.spans.push(CommentSpan {
                        start: idx,
                        end: idx,
                        is_doc,
                    });
                } else {
                    region = Region::Block {
                        close: block.close,
                        start: idx,
                        is_doc,
                    };
                }
                continue;
            }

            let class = if self.language.placement() == DocPlacement::Below
                && starts_with_string(trimmed)
            {
                LineClass::Text
            } else {
                LineClass::Code
            };
            classes.push(class);

            if class == LineClass::Code
                && let Some(found) = self.detect(idx, &classes)
            {
                detected.push(found);
            }

            region = self.region_after(idx);
        }

        if module_header && let Some(header) = self.module_header(&detected, source_name) {
            detected.insert(0, header);
        }

        Scan { detected, classes }
    }

    fn record_line_comment(&mut self, idx: usize, is_doc: bool) {
        match self.spans.last_mut() {
            Some(span) if span.end + 1 == idx && span.is_doc == is_doc => span.end = idx,
            _ => self.spans.push(CommentSpan {
                start: idx,
                end: idx,
                is_doc,
            }),
        }
    }

    /// Region a code line leaves the scanner in
    fn region_after(&self, idx: usize) -> Region {
        let line = self.lines[idx];

        if !self.rules.string_blocks.is_empty() {
            // Only delimiters outside comments and ordinary strings count
            let code = code_part(line, self.rules);
            for delim in self.rules.string_blocks {
                if code.matches(delim).count() % 2 == 1 {
                    return Region::Text { delim };
                }
            }
        }

        if let Some(block) = &self.rules.block_comment {
            let masked = mask_strings(line, self.rules);
            let open_at = match self.rules.line_comment {
                Some(prefix) => masked.find(prefix).map_or(masked.len(), |p| p),
                None => masked.len(),
            };
            if let Some(pos) = masked[..open_at].rfind(block.open)
                && !masked[pos + block.open.len()..].contains(block.close)
            {
                return Region::Block {
                    close: block.close,
                    start: idx,
                    is_doc: false,
                };
            }
        }

        Region::Code
    }

    fn detect(&self, idx: usize, classes: &[LineClass]) -> Option<Detected> {
        if self.language == Language::Css {
            return self.detect_rule(idx, classes);
        }

        let line = self.lines[idx];
        let (kind, caps) = self.rules.match_declaration(line)?;

        let name_match = caps.name("name")?;
        let name = name_match.as_str().trim();
        if name.is_empty() {
            return None;
        }
        let keyword = caps
            .name("kw")
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| kind.as_str().to_string());

        let mut construct = Construct::new(kind, name, idx + 1)
            .with_keyword(keyword)
            .with_indent(indent_of(line));

        let mut params_end = None;
        if kind == ConstructKind::Function {
            if let Some(single) = caps.name("single") {
                construct.params = vec![single.as_str().to_string()];
                params_end = Some(ParamsEnd {
                    line: idx,
                    col: single.end(),
                });
            } else {
                let (params, end) =
                    parameters(self.lines, idx, name_match.end(), self.rules, self.language);
                construct.params = params;
                params_end = end;
            }
        }

        let doc = match self.language.placement() {
            DocPlacement::Above => {
                if let Some(end) = params_end {
                    construct.signature_end = end.line + 1;
                }
                self.doc_above(idx)
            }
            DocPlacement::Below => {
                let (header_end, inline_body) = python_header_end(self.lines, idx, self.rules);
                construct.signature_end = header_end + 1;
                construct.inline_body = inline_body;
                if inline_body {
                    self.inline_docstring(header_end).or_else(|| self.doc_above(idx))
                } else {
                    self.docstring_below(idx, header_end)
                }
            }
        };

        Some(Detected {
            construct: construct.documented_by(doc),
            name_end: name_match.end(),
            params_end,
        })
    }

    /// CSS rule opened on line `idx`. The selector may start on earlier lines
    /// (`.a,\n.b {` or `h1\n{`); the rule is reported at its first line.
    fn detect_rule(&self, idx: usize, classes: &[LineClass]) -> Option<Detected> {
        let line = self.lines[idx];
        let brace = code_part(line, self.rules).find('{')?;
        let head = line[..brace].trim();

        let mut start = idx;
        while start > 0 && classes[start - 1] == LineClass::Code {
            let prev = code_part(self.lines[start - 1], self.rules);
            let prev = prev.trim();
            let continues = prev.ends_with(',') || (start == idx && head.is_empty());
            if prev.is_empty() || prev.contains(['{', '}', ';']) || !continues {
                break;
            }
            start -= 1;
        }

        let selector = self.lines[start..idx]
            .iter()
            .map(|l| l.trim())
            .chain(std::iter::once(head))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let opened = format!("{selector} {{");
        let (kind, caps) = self.rules.match_declaration(&opened)?;
        let name = caps.name("name")?.as_str().trim();
        if name.is_empty() {
            return None;
        }

        let construct = Construct::new(kind, name, start + 1)
            .with_keyword(kind.as_str())
            .with_indent(indent_of(self.lines[start]))
            .documented_by(self.doc_above(start));

        Some(Detected {
            construct,
            name_end: 0,
            params_end: None,
        })
    }

    /// Doc comment ending directly above the declaration, skipping
    /// decorator and attribute lines
    fn doc_above(&self, idx: usize) -> Option<DocSpan> {
        let mut p = idx;
        let mut attr_doc = None;
        while p > 0 && self.rules.is_attribute(self.lines[p - 1]) {
            p -= 1;
            if self.lines[p].trim_start().starts_with("#[doc") {
                attr_doc = Some(self.doc_span(p, p));
            }
        }
        if p == 0 {
            return attr_doc;
        }

        let above = p - 1;
        self.spans
            .last()
            .filter(|span| span.end == above && span.is_doc)
            .map(|span| self.doc_span(span.start, span.end))
            .or(attr_doc)
    }

    /// First statement of a Python body when it is a string literal.
    /// Blank and comment lines are not statements.
    fn docstring_below(&self, idx: usize, header_end: usize) -> Option<DocSpan> {
        let def_indent = indent_of(self.lines[idx]).len();
        let t = (header_end + 1..self.lines.len()).find(|&j| {
            let trimmed = self.lines[j].trim();
            !trimmed.is_empty() && !self.rules.is_line_comment(trimmed)
        })?;
        if indent_of(self.lines[t]).len() <= def_indent {
            return None;
        }
        self.string_span(t)
    }

    /// `def f(): """Doc."""`
    fn inline_docstring(&self, header_end: usize) -> Option<DocSpan> {
        let body = python_inline_body(self.lines[header_end], self.rules);
        starts_with_docstring(body).then(|| self.doc_span(header_end, header_end))
    }

    /// Span of the string literal opening on line `t`
    fn string_span(&self, t: usize) -> Option<DocSpan> {
        let trimmed = self.lines[t].trim_start();
        if !starts_with_docstring(trimmed) {
            return None;
        }
        let literal = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic());

        let end = self
            .rules
            .string_blocks
            .iter()
            .find(|d| literal.starts_with(*d))
            .map(|delim| {
                let rest = &literal[delim.len()..];
                if rest.contains(delim) {
                    t
                } else {
                    (t + 1..self.lines.len())
                        .find(|&j| self.lines[j].contains(delim))
                        .unwrap_or(self.lines.len() - 1)
                }
            })
            .unwrap_or(t);

        Some(self.doc_span(t, end))
    }

    fn doc_span(&self, start: usize, end: usize) -> DocSpan {
        DocSpan {
            start_line: start + 1,
            end_line: end + 1,
            text: self.lines[start..=end]
                .iter()
                .map(|l| l.trim())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Header construct at the first content line after the preamble, unless
    /// a declaration or its doc comment already sits there
    fn module_header(&self, detected: &[Detected], source_name: Option<&str>) -> Option<Detected> {
        let mut first = 0;
        while first < self.lines.len() && is_preamble(self.language, first, self.lines[first]) {
            first += 1;
        }
        let first = (first..self.lines.len()).find(|&i| !self.lines[i].trim().is_empty())?;

        let claimed = detected.iter().any(|d| {
            d.construct.line == first + 1
                || d.construct.doc.as_ref().is_some_and(|doc| doc.start_line == first + 1)
        });
        if claimed {
            return None;
        }

        let trimmed = self.lines[first].trim_start();
        let doc = if !self.rules.is_header_doc(trimmed) {
            None
        } else if self.language == Language::Python && starts_with_string(trimmed) {
            self.string_span(first)
        } else {
            Some(
                self.spans
                    .iter()
                    .find(|span| span.start == first)
                    .map(|span| self.doc_span(span.start, span.end))
                    .unwrap_or_else(|| self.doc_span(first, first)),
            )
        };

        let construct = Construct::new(
            ConstructKind::ModuleHeader,
            source_name.unwrap_or("module"),
            first + 1,
        )
        .with_keyword("module")
        .with_indent(indent_of(self.lines[first]))
        .documented_by(doc);

        Some(Detected {
            construct,
            name_end: 0,
            params_end: None,
        })
    }
}

/// Whether `line` holds the closing `delim` of an open literal
fn closes_literal(line: &str, delim: &str) -> bool {
    line.match_indices(delim)
        .any(|(pos, _)| !line[..pos].ends_with('\\'))
}

/// Code text of a line from `from_col`, used by metric passes
pub(crate) fn code_from(line: &str, from_col: usize, rules: &LanguageRules) -> String {
    let code = code_part(line, rules);
    let start = from_col.min(code.len());
    if code.is_char_boundary(start) {
        code[start..].to_string()
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str, language: Language) -> Vec<Construct> {
        let lines: Vec<&str> = src.lines().collect();
        Scanner::new(&lines, language)
            .scan(false, None)
            .detected
            .into_iter()
            .map(|d| d.construct)
            .collect()
    }

    fn summary(constructs: &[Construct]) -> Vec<(String, usize, bool)> {
        constructs
            .iter()
            .map(|c| (c.name.clone(), c.line, c.has_doc))
            .collect()
    }

    #[test]
    fn test_python_docstrings() {
        let src = "def add(a, b):\n    return a + b\n\nclass Cart:\n    \"\"\"A cart.\"\"\"\n    def total(self):\n\n        \"\"\"\n        Sum.\n        \"\"\"\n        return 0\n";
        let found = scan(src, Language::Python);
        assert_eq!(
            summary(&found),
            vec![
                ("add".to_string(), 1, false),
                ("Cart".to_string(), 4, true),
                ("total".to_string(), 6, true),
            ]
        );
        let doc = found[2].doc.as_ref().unwrap();
        assert_eq!((doc.start_line, doc.end_line), (8, 10));
    }

    #[test]
    fn test_python_ignores_declarations_in_docstrings() {
        let src = "def outer():\n    \"\"\"\n    def fake():\n    \"\"\"\n    pass\n";
        let found = scan(src, Language::Python);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "outer");
        assert!(found[0].has_doc);
    }

    #[test]
    fn test_python_inline_body() {
        let src = "# Double it.\ndef double(x): return x * 2\ndef triple(x): return x * 3\n";
        let found = scan(src, Language::Python);
        assert!(found[0].inline_body);
        assert_eq!(
            summary(&found),
            vec![("double".to_string(), 2, true), ("triple".to_string(), 3, false)]
        );
    }

    #[test]
    fn test_python_multiline_signature() {
        let src = "def build(\n    name,\n    size,\n):\n    \"\"\"Build it.\"\"\"\n";
        let found = scan(src, Language::Python);
        assert_eq!(found[0].signature_end, 4);
        assert_eq!(found[0].params, vec!["name", "size"]);
        assert!(found[0].has_doc);
    }

    #[test]
    fn test_jsdoc_adjacency() {
        let src = "/**\n * Adds.\n */\nfunction add(a, b) {}\n\n/** Gap. */\n\nfunction gap() {}\n/* plain */\nfunction plain() {}\n";
        let found = scan(src, Language::JavaScript);
        assert_eq!(
            summary(&found),
            vec![
                ("add".to_string(), 4, true),
                ("gap".to_string(), 8, false),
                ("plain".to_string(), 10, false),
            ]
        );
    }

    #[test]
    fn test_decorators_between_doc_and_class() {
        let src = "/** Widget. */\n@Component({})\nexport class Widget {}\n";
        let found = scan(src, Language::TypeScript);
        assert!(found[0].has_doc);
    }

    #[test]
    fn test_declarations_inside_block_comment_ignored() {
        let src = "/*\nfunction hidden() {}\n*/\nconst pattern = \"src/**/*.js\";\nfunction visible() {}\n";
        let found = scan(src, Language::JavaScript);
        assert_eq!(summary(&found), vec![("visible".to_string(), 5, false)]);
    }

    #[test]
    fn test_rust_doc_comments_and_attributes() {
        let src = "/// A point.\n#[derive(Debug)]\npub struct Point;\n\n//// banner\nfn hidden() {}\n\n#[doc = \"Run.\"]\nfn run() {}\n";
        let found = scan(src, Language::Rust);
        assert_eq!(
            summary(&found),
            vec![
                ("Point".to_string(), 3, true),
                ("hidden".to_string(), 6, false),
                ("run".to_string(), 9, true),
            ]
        );
    }

    #[test]
    fn test_html_sections() {
        let src = "<body>\n<!-- Navigation -->\n<nav id=\"menu\">\n</nav>\n<div class=\"card\">\n</div>\n";
        let found = scan(src, Language::Html);
        assert_eq!(
            summary(&found),
            vec![("menu".to_string(), 3, true), ("card".to_string(), 5, false)]
        );
        assert_eq!(found[0].keyword, "nav");
    }

    #[test]
    fn test_css_rules() {
        let src = "/* Buttons */\n.btn {\n  color: red;\n}\n\n.card {\n}\n@media print {\n  .card { display: none; }\n}\n";
        let found = scan(src, Language::Css);
        assert_eq!(
            summary(&found),
            vec![
                (".btn".to_string(), 2, true),
                (".card".to_string(), 6, false),
                (".card".to_string(), 9, false),
            ]
        );
    }

    #[test]
    fn test_css_selector_spanning_lines() {
        let src = "/* Headings */\n.a,\n.b {\n  color: red;\n}\n\nh1\n{\n  margin: 0;\n}\n";
        let found = scan(src, Language::Css);
        assert_eq!(
            summary(&found),
            vec![(".a, .b".to_string(), 2, true), ("h1".to_string(), 7, false)]
        );
    }

    #[test]
    fn test_python_comment_before_docstring() {
        let src = "class A:\n    # note\n\n    \"\"\"Doc.\"\"\"\n    x = 1\n";
        let found = scan(src, Language::Python);
        assert!(found[0].has_doc);
        let doc = found[0].doc.as_ref().unwrap();
        assert_eq!((doc.start_line, doc.end_line), (4, 4));
    }

    #[test]
    fn test_python_quotes_in_comments_and_strings() {
        let src = "x = 1  # use \"\"\" for docs\nq = \"'''\"\ndef foo():\n    pass\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Python).scan(false, None);
        assert_eq!(&scan.classes[..3], &[LineClass::Code; 3]);
        assert_eq!(scan.detected.len(), 1);
        assert_eq!(scan.detected[0].construct.name, "foo");
    }

    #[test]
    fn test_template_literal_spanning_lines() {
        let src = "const t = `\nfunction fake() {}\n\\`still inside\n`;\nfunction real() {}\n";
        let found = scan(src, Language::JavaScript);
        assert_eq!(summary(&found), vec![("real".to_string(), 5, false)]);

        let src = "const s = `one line`;\nfunction after() {}\n";
        let found = scan(src, Language::TypeScript);
        assert_eq!(summary(&found), vec![("after".to_string(), 2, false)]);
    }

    #[test]
    fn test_module_header() {
        let src = "#!/usr/bin/env python3\n\nimport os\n\ndef f():\n    pass\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Python).scan(true, Some("tool"));
        let header = &scan.detected[0].construct;
        assert_eq!(header.kind, ConstructKind::ModuleHeader);
        assert_eq!(header.name, "tool");
        assert_eq!(header.line, 3);
        assert!(!header.has_doc);

        let src = "\"\"\"Tool.\"\"\"\nimport os\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Python).scan(true, None);
        assert!(scan.detected[0].construct.has_doc);
    }

    #[test]
    fn test_module_header_skipped_on_declaration() {
        let src = "fn main() {}\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Rust).scan(true, None);
        assert_eq!(scan.detected.len(), 1);
        assert_eq!(scan.detected[0].construct.kind, ConstructKind::Function);

        let src = "/// Entry point.\nfn main() {}\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Rust).scan(true, None);
        assert_eq!(scan.detected.len(), 1);

        let src = "// Copyright\nuse std::io;\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Rust).scan(true, None);
        assert_eq!(scan.detected.len(), 1);
        assert!(!scan.detected[0].construct.has_doc);
    }

    #[test]
    fn test_line_classes() {
        let src = "x = 1\n\n# note\n\"\"\"\ntext\n\"\"\"\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Python).scan(false, None);
        assert_eq!(
            scan.classes,
            vec![
                LineClass::Code,
                LineClass::Blank,
                LineClass::Comment,
                LineClass::Text,
                LineClass::Text,
                LineClass::Text,
            ]
        );
    }
}
