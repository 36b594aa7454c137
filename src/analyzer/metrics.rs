//! Body metrics for detected constructs.
//!
//! Runs after the scan, when every line's class is known: locates function
//! bodies, then derives cyclomatic complexity (1 + branch keywords), whether a
//! value is returned, and the methods declared directly in a Python class.

use crate::constants::analysis::MAX_SIGNATURE_LINES;

use super::construct::ConstructKind;
use super::detect::{Detected, LineClass, code_from};
use super::language::Language;
use super::rules::{LanguageRules, rules};
use super::signature::{code_part, indent_of};

/// Body of a function: inclusive line range, body text on the first line
/// starts at `start_col`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Body {
    start: usize,
    start_col: usize,
    end: usize,
}

pub struct Metrics<'a> {
    lines: &'a [&'a str],
    classes: &'a [LineClass],
    language: Language,
    rules: &'static LanguageRules,
}

impl<'a> Metrics<'a> {
    pub fn new(lines: &'a [&'a str], classes: &'a [LineClass], language: Language) -> Self {
        Self {
            lines,
            classes,
            language,
            rules: rules(language),
        }
    }

    pub fn enrich(&self, detected: &mut [Detected]) {
        for d in detected.iter_mut() {
            match d.construct.kind {
                ConstructKind::Function => self.enrich_function(d),
                ConstructKind::Class if self.language == Language::Python => {
                    d.construct.members = self.python_members(d);
                }
                _ => {}
            }
        }
    }

    fn enrich_function(&self, d: &mut Detected) {
        let (body, header_returns) = if self.language == Language::Python {
            (self.python_body(d), false)
        } else {
            self.brace_body(d)
        };

        let mut complexity = 1;
        let mut returns = header_returns;
        if let Some(body) = body {
            for li in body.start..=body.end {
                if self.classes[li] != LineClass::Code {
                    continue;
                }
                let col = if li == body.start { body.start_col } else { 0 };
                let code = code_from(self.lines[li], col, self.rules);
                complexity += self.rules.count_branches(&code);
                returns |= self.rules.has_return_value(&code);
            }
        }

        d.construct.complexity = Some(complexity);
        d.construct.returns_value = returns;
    }

    /// Indented block after the header, or the header line itself for
    /// one-line bodies
    fn python_body(&self, d: &Detected) -> Option<Body> {
        let header_end = d.construct.signature_end - 1;
        if d.construct.inline_body {
            return Some(Body {
                start: header_end,
                start_col: 0,
                end: header_end,
            });
        }

        let def_indent = d.construct.indent.len();
        let mut end = None;
        for li in header_end + 1..self.lines.len() {
            match self.classes[li] {
                LineClass::Blank | LineClass::Comment | LineClass::Text => continue,
                LineClass::Code if indent_of(self.lines[li]).len() > def_indent => end = Some(li),
                LineClass::Code => break,
            }
        }

        end.map(|end| Body {
            start: header_end + 1,
            start_col: 0,
            end,
        })
    }

    /// Brace-delimited body after the parameter list. Returns the body and
    /// whether the header declares a return type (`-> T`).
    fn brace_body(&self, d: &Detected) -> (Option<Body>, bool) {
        let (from_line, from_col) = match d.params_end {
            Some(end) => (end.line, end.col),
            None => (d.construct.line - 1, d.name_end),
        };

        let mut header = String::new();
        let last = (from_line + MAX_SIGNATURE_LINES).min(self.lines.len());
        for li in from_line..last {
            if self.classes[li] != LineClass::Code {
                continue;
            }
            let col = if li == from_line { from_col } else { 0 };
            let code = code_from(self.lines[li], col, self.rules);

            let mut prev = ' ';
            for (off, c) in code.char_indices() {
                match c {
                    '{' => {
                        let start_col = col + off;
                        let body = self.match_braces(li, start_col);
                        return (Some(body), self.header_returns(&header));
                    }
                    ';' => return (None, self.header_returns(&header)),
                    '>' if prev == '=' => {
                        // arrow with an expression body
                        let rest = code[off + 1..].trim_start();
                        if !rest.is_empty() && !rest.starts_with('{') {
                            let body = Body {
                                start: li,
                                start_col: col + off + 1,
                                end: li,
                            };
                            return (Some(body), true);
                        }
                    }
                    _ => {}
                }
                header.push(c);
                prev = c;
            }
            header.push(' ');
        }
        (None, self.header_returns(&header))
    }

    fn header_returns(&self, header: &str) -> bool {
        if self.language != Language::Rust {
            return false;
        }
        header
            .split_once("->")
            .is_some_and(|(_, ret)| !ret.trim().is_empty() && ret.trim() != "()")
    }

    fn match_braces(&self, start: usize, start_col: usize) -> Body {
        let mut depth = 0i32;
        for li in start..self.lines.len() {
            if self.classes[li] != LineClass::Code {
                continue;
            }
            let col = if li == start { start_col } else { 0 };
            for c in code_from(self.lines[li], col, self.rules).chars() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Body {
                                start,
                                start_col,
                                end: li,
                            };
                        }
                    }
                    _ => {}
                }
            }
        }
        Body {
            start,
            start_col,
            end: self.lines.len().saturating_sub(1),
        }
    }

    /// Methods declared at the first indentation level of a class body
    fn python_members(&self, d: &Detected) -> Vec<String> {
        let Some(body) = self.python_body(d) else {
            return Vec::new();
        };
        if d.construct.inline_body {
            return Vec::new();
        }

        let Some(member_indent) = (body.start..=body.end)
            .find(|&li| self.classes[li] == LineClass::Code)
            .map(|li| indent_of(self.lines[li]).len())
        else {
            return Vec::new();
        };

        (body.start..=body.end)
            .filter(|&li| self.classes[li] == LineClass::Code)
            .filter(|&li| indent_of(self.lines[li]).len() == member_indent)
            .filter_map(|li| {
                let line = self.lines[li];
                match self.rules.match_declaration(line) {
                    Some((ConstructKind::Function, caps)) => {
                        caps.name("name").map(|m| m.as_str().to_string())
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Lines whose code matches an inline suggestion pattern
    pub fn inline_suggestions(&self) -> Vec<(usize, &'static str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(li, _)| self.classes[*li] == LineClass::Code)
            .filter_map(|(li, line)| {
                self.rules
                    .inline_suggestion(&code_part(line, self.rules))
                    .map(|msg| (li + 1, msg))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::construct::Construct;
    use crate::analyzer::detect::Scanner;

    fn enriched(src: &str, language: Language) -> Vec<Construct> {
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, language).scan(false, None);
        let mut detected = scan.detected;
        Metrics::new(&lines, &scan.classes, language).enrich(&mut detected);
        detected.into_iter().map(|d| d.construct).collect()
    }

    #[test]
    fn test_python_complexity_and_returns() {
        let src = "\
def busy(items):
    for item in items:
        if item:
            try:
                pass
            except ValueError:
                pass
        elif item is None:
            while True:
                break
    return len(items)

def quiet():
    print('if for while')
";
        let found = enriched(src, Language::Python);
        assert_eq!(found[0].complexity, Some(6));
        assert!(found[0].returns_value);
        assert_eq!(found[1].complexity, Some(1));
        assert!(!found[1].returns_value);
    }

    #[test]
    fn test_python_members() {
        let src = "\
class Cart:
    def add(self, item):
        def helper():
            pass

    def total(self):
        return 0

def outside():
    pass
";
        let found = enriched(src, Language::Python);
        assert_eq!(found[0].members, vec!["add", "total"]);
    }

    #[test]
    fn test_js_body_metrics() {
        let src = "\
function pick(a, b) {
  // if this were real
  if (a && b) {
    return a;
  }
  for (const x of b) {}
  return null;
}
const twice = x => x * 2;
function noop() {}
";
        let found = enriched(src, Language::JavaScript);
        assert_eq!(found[0].complexity, Some(3));
        assert!(found[0].returns_value);
        assert!(found[1].returns_value);
        assert_eq!(found[2].complexity, Some(1));
        assert!(!found[2].returns_value);
    }

    #[test]
    fn test_rust_return_type() {
        let src = "\
fn area(w: u32, h: u32) -> u32 {
    match w {
        0 => 0,
        _ => if h > 0 { w * h } else { 0 },
    }
}

fn log(msg: &str) {
    println!(\"{msg}\");
}

fn unit() -> () {}
";
        let found = enriched(src, Language::Rust);
        assert!(found[0].returns_value);
        assert_eq!(found[0].complexity, Some(3));
        assert!(!found[1].returns_value);
        assert!(!found[2].returns_value);
    }

    #[test]
    fn test_inline_suggestions() {
        let src = "for x in xs:\n    # for y in ys:\n    try:\n        pass\n";
        let lines: Vec<&str> = src.lines().collect();
        let scan = Scanner::new(&lines, Language::Python).scan(false, None);
        let found = Metrics::new(&lines, &scan.classes, Language::Python).inline_suggestions();
        assert_eq!(
            found,
            vec![(1, "Loop through items"), (3, "Handle potential errors")]
        );
    }
}
