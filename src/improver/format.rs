//! Doc block rendering: comment markers, indentation and placement.

use crate::analyzer::{Construct, ConstructKind, Language};

/// Shape of an inserted documentation block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `"""..."""` as the first statement of a Python body or module
    Docstring,
    /// `# ...` lines above a one-line Python definition
    HashComment,
    /// `/** ... */`
    JsDoc,
    /// `/// ...`
    RustOuter,
    /// `//! ...`
    RustInner,
    /// `/* ... */`
    CssBlock,
    /// `<!-- ... -->`
    HtmlComment,
}

impl BlockStyle {
    pub fn for_construct(language: Language, construct: &Construct) -> Self {
        let header = construct.kind == ConstructKind::ModuleHeader;
        match language {
            Language::Python if construct.inline_body && !header => Self::HashComment,
            Language::Python => Self::Docstring,
            Language::JavaScript | Language::TypeScript => Self::JsDoc,
            Language::Rust if header => Self::RustInner,
            Language::Rust => Self::RustOuter,
            Language::Css => Self::CssBlock,
            Language::Html => Self::HtmlComment,
        }
    }

    /// Sequence that would end the block early if it appeared in the text
    pub fn closing_delimiter(&self) -> Option<&'static str> {
        match self {
            Self::Docstring => Some("\"\"\""),
            Self::JsDoc | Self::CssBlock => Some("*/"),
            Self::HtmlComment => Some("-->"),
            Self::HashComment | Self::RustOuter | Self::RustInner => None,
        }
    }

    /// Wrap body lines in this style's markers at the given indentation
    pub fn render(&self, indent: &str, body: &[String]) -> Vec<String> {
        match self {
            Self::Docstring => docstring(indent, body),
            Self::HashComment => prefixed(indent, "#", body),
            Self::RustOuter => prefixed(indent, "///", body),
            Self::RustInner => prefixed(indent, "//!", body),
            Self::JsDoc => starred(indent, "/**", body),
            Self::CssBlock => starred(indent, "/*", body),
            Self::HtmlComment => match body {
                [line] => vec![format!("{indent}<!-- {line} -->")],
                _ => {
                    let mut out = vec![format!("{indent}<!--")];
                    out.extend(body.iter().map(|l| indented(indent, "  ", l)));
                    out.push(format!("{indent}-->"));
                    out
                }
            },
        }
    }
}

fn docstring(indent: &str, body: &[String]) -> Vec<String> {
    match body {
        [line] if !line.ends_with('"') => vec![format!("{indent}\"\"\"{line}\"\"\"")],
        [first, rest @ ..] => {
            let mut out = vec![format!("{indent}\"\"\"{first}")];
            out.extend(rest.iter().map(|l| indented(indent, "", l)));
            out.push(format!("{indent}\"\"\""));
            out
        }
        [] => vec![format!("{indent}\"\"\"\"\"\"")],
    }
}

fn prefixed(indent: &str, marker: &str, body: &[String]) -> Vec<String> {
    body.iter()
        .map(|l| {
            if l.is_empty() {
                format!("{indent}{marker}")
            } else {
                format!("{indent}{marker} {l}")
            }
        })
        .collect()
}

fn starred(indent: &str, open: &str, body: &[String]) -> Vec<String> {
    match body {
        [line] => vec![format!("{indent}{open} {line} */")],
        _ => {
            let mut out = vec![format!("{indent}{open}")];
            out.extend(body.iter().map(|l| {
                if l.is_empty() {
                    format!("{indent} *")
                } else {
                    format!("{indent} * {l}")
                }
            }));
            out.push(format!("{indent} */"));
            out
        }
    }
}

fn indented(indent: &str, extra: &str, line: &str) -> String {
    if line.is_empty() {
        String::new()
    } else {
        format!("{indent}{extra}{line}")
    }
}

/// Indentation of the first body line of a Python definition, or one level
/// deeper than the header when the body is empty
pub fn python_body_indent(lines: &[&str], construct: &Construct) -> String {
    let def_indent = construct.indent.as_str();
    lines
        .iter()
        .skip(construct.signature_end)
        .find(|l| !l.trim().is_empty())
        .map(|l| {
            let trimmed = l.trim_start();
            &l[..l.len() - trimmed.len()]
        })
        .filter(|ind| ind.len() > def_indent.len())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let unit = if def_indent.contains('\t') { "\t" } else { "    " };
            format!("{def_indent}{unit}")
        })
}

/// Dominant line ending of a text
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_docstring_rendering() {
        assert_eq!(
            BlockStyle::Docstring.render("    ", &body(&["Add."])),
            vec!["    \"\"\"Add.\"\"\""]
        );
        assert_eq!(
            BlockStyle::Docstring.render("    ", &body(&["Add.", "", "Args:", "    a: A"])),
            vec!["    \"\"\"Add.", "", "    Args:", "        a: A", "    \"\"\""]
        );
        assert_eq!(
            BlockStyle::Docstring.render("", &body(&["Say \"hi\""])),
            vec!["\"\"\"Say \"hi\"", "\"\"\""]
        );
    }

    #[test]
    fn test_comment_rendering() {
        assert_eq!(
            BlockStyle::JsDoc.render("  ", &body(&["Sum.", "", "@param {any} a - A"])),
            vec!["  /**", "   * Sum.", "   *", "   * @param {any} a - A", "   */"]
        );
        assert_eq!(BlockStyle::JsDoc.render("", &body(&["Sum."])), vec!["/** Sum. */"]);
        assert_eq!(
            BlockStyle::RustOuter.render("    ", &body(&["Run.", ""])),
            vec!["    /// Run.", "    ///"]
        );
        assert_eq!(
            BlockStyle::HtmlComment.render("  ", &body(&["NAV section: menu"])),
            vec!["  <!-- NAV section: menu -->"]
        );
        assert_eq!(
            BlockStyle::CssBlock.render("", &body(&["Styles for .a"])),
            vec!["/* Styles for .a */"]
        );
        assert_eq!(
            BlockStyle::HashComment.render("", &body(&["Double.", ""])),
            vec!["# Double.", "#"]
        );
    }

    #[test]
    fn test_style_selection() {
        let mut c = Construct::new(ConstructKind::Function, "f", 1);
        assert_eq!(BlockStyle::for_construct(Language::Python, &c), BlockStyle::Docstring);
        c.inline_body = true;
        assert_eq!(BlockStyle::for_construct(Language::Python, &c), BlockStyle::HashComment);

        let header = Construct::new(ConstructKind::ModuleHeader, "lib", 1);
        assert_eq!(BlockStyle::for_construct(Language::Rust, &header), BlockStyle::RustInner);
        assert_eq!(BlockStyle::for_construct(Language::Python, &header), BlockStyle::Docstring);
    }

    #[test]
    fn test_python_body_indent() {
        let lines = vec!["class A:", "\tdef f(self):", "\t\tpass"];
        let mut c = Construct::new(ConstructKind::Function, "f", 2).with_indent("\t");
        c.signature_end = 2;
        assert_eq!(python_body_indent(&lines, &c), "\t\t");

        let lines = vec!["def f():"];
        let mut c = Construct::new(ConstructKind::Function, "f", 1);
        c.signature_end = 1;
        assert_eq!(python_body_indent(&lines, &c), "    ");
    }

    #[test]
    fn test_line_ending() {
        assert_eq!(line_ending("a\r\nb\r\n"), "\r\n");
        assert_eq!(line_ending("a\nb"), "\n");
        assert_eq!(line_ending(""), "\n");
    }
}
