//! Line-level lexing helpers: string masking, parameter lists, header ends.

use crate::constants::analysis::MAX_SIGNATURE_LINES;

use super::language::Language;
use super::rules::LanguageRules;

/// Blank out string literal contents, keeping byte offsets stable.
///
/// Quotes themselves are kept so callers can still see that a literal was
/// there. Rust char literals (`'{'`) are masked too; lifetimes are left alone.
pub fn mask_strings(line: &str, rules: &LanguageRules) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.char_indices().peekable();
    let mut open: Option<char> = None;

    while let Some((pos, c)) = chars.next() {
        match open {
            Some(q) => {
                if c == '\\' {
                    blank(&mut out, c);
                    if let Some((_, escaped)) = chars.next() {
                        blank(&mut out, escaped);
                    }
                } else if c == q {
                    open = None;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
            None if rules.quotes.contains(&c) => {
                open = Some(c);
                out.push(c);
            }
            None if c == '\'' && rules.track_angles && !rules.quotes.contains(&'\'') => {
                // Rust: 'x' or '\n' is a char literal, 'a is a lifetime
                let rest = &line[pos + 1..];
                match char_literal_len(rest) {
                    Some(len) => {
                        out.push('\'');
                        for ch in rest[..len - 1].chars() {
                            blank(&mut out, ch);
                        }
                        out.push('\'');
                        for _ in 0..rest[..len].chars().count() {
                            chars.next();
                        }
                    }
                    None => out.push(c),
                }
            }
            None => out.push(c),
        }
    }
    out
}

fn blank(out: &mut String, c: char) {
    for _ in 0..c.len_utf8() {
        out.push(' ');
    }
}

/// Byte length of a char literal body including the closing quote
fn char_literal_len(rest: &str) -> Option<usize> {
    let mut it = rest.char_indices();
    let (_, first) = it.next()?;
    if first == '\\' {
        // '\n', '\'', '\u{1F600}'
        rest.char_indices()
            .skip(2)
            .take(10)
            .find(|(_, c)| *c == '\'')
            .map(|(i, _)| i + 1)
    } else {
        let (i, second) = it.next()?;
        (second == '\'').then_some(i + 1)
    }
}

/// Code portion of a line: strings masked, trailing line comment removed
pub fn code_part(line: &str, rules: &LanguageRules) -> String {
    let mut masked = mask_strings(line, rules);
    if let Some(prefix) = rules.line_comment
        && let Some(pos) = masked.find(prefix)
    {
        masked.truncate(pos);
    }
    masked
}

/// Leading whitespace of a line
pub fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Whether a Python line opens a string literal (`"`, `'''`, `r"..."`, `f'...'`)
pub fn starts_with_string(trimmed: &str) -> bool {
    let rest = trimmed.trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'));
    trimmed.len() - rest.len() <= 2 && (rest.starts_with('"') || rest.starts_with('\''))
}

/// Whether a Python line opens a literal that can be a docstring. F-strings
/// never are.
pub fn starts_with_docstring(trimmed: &str) -> bool {
    let prefix = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len();
    starts_with_string(trimmed) && !trimmed[..prefix].contains(['f', 'F'])
}

/// Position just past the closing paren of a parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamsEnd {
    pub line: usize,
    pub col: usize,
}

/// Extract parameter names from the first parenthesised list after `from_col`
/// on line `idx`. Lists may span lines.
pub fn parameters(
    lines: &[&str],
    idx: usize,
    from_col: usize,
    rules: &LanguageRules,
    language: Language,
) -> (Vec<String>, Option<ParamsEnd>) {
    let mut generic_depth = 0i32;
    let mut depth = 0i32;
    let mut started = false;
    let mut current = String::new();
    let mut raw = Vec::new();
    let mut prev = ' ';

    for (li, line) in lines.iter().enumerate().skip(idx).take(MAX_SIGNATURE_LINES) {
        let masked = code_part(line, rules);
        let start = if li == idx { from_col.min(masked.len()) } else { 0 };

        for (off, c) in masked[start..].char_indices() {
            let col = start + off;
            if !started {
                match c {
                    '<' if rules.track_angles => generic_depth += 1,
                    '>' if rules.track_angles && prev != '-' && prev != '=' => generic_depth -= 1,
                    '[' => generic_depth += 1,
                    ']' => generic_depth -= 1,
                    '(' if generic_depth <= 0 => {
                        started = true;
                        depth = 1;
                    }
                    '{' | ';' if generic_depth <= 0 => return (Vec::new(), None),
                    _ => {}
                }
            } else {
                match c {
                    '(' | '[' | '{' => depth += 1,
                    '<' if rules.track_angles => depth += 1,
                    '>' if rules.track_angles && prev != '-' && prev != '=' => depth -= 1,
                    ')' | ']' | '}' => {
                        depth -= 1;
                        if depth == 0 {
                            raw.push(std::mem::take(&mut current));
                            let end = ParamsEnd { line: li, col: col + 1 };
                            return (clean_params(raw, language), Some(end));
                        }
                    }
                    ',' if depth == 1 => {
                        raw.push(std::mem::take(&mut current));
                        prev = c;
                        continue;
                    }
                    _ => {}
                }
                current.push(c);
            }
            prev = c;
        }
        if started {
            current.push(' ');
        }
    }

    raw.push(current);
    (clean_params(raw, language), None)
}

fn clean_params(raw: Vec<String>, language: Language) -> Vec<String> {
    raw.iter()
        .filter_map(|p| param_name(p.trim(), language))
        .collect()
}

fn param_name(param: &str, language: Language) -> Option<String> {
    if param.is_empty() {
        return None;
    }

    let name = match language {
        Language::Python => {
            let p = param.trim_start_matches('*');
            let name = p.split([':', '=']).next().unwrap_or("").trim();
            if matches!(name, "" | "/" | "self" | "cls") {
                return None;
            }
            name.to_string()
        }
        Language::JavaScript | Language::TypeScript => {
            let mut p = param.trim_start_matches("...");
            for modifier in ["public ", "private ", "protected ", "readonly ", "override "] {
                p = p.trim_start_matches(modifier).trim_start();
            }
            if p.starts_with('{') {
                "options".to_string()
            } else if p.starts_with('[') {
                "items".to_string()
            } else {
                let name = p.split([':', '=', '?']).next().unwrap_or("").trim();
                if matches!(name, "" | "this") {
                    return None;
                }
                name.to_string()
            }
        }
        Language::Rust => {
            let pat = param.split(':').next().unwrap_or("").trim();
            let pat = pat.strip_prefix("mut ").unwrap_or(pat).trim();
            if pat.ends_with("self") || matches!(pat, "" | "_") {
                return None;
            }
            pat.to_string()
        }
        Language::Html | Language::Css => return None,
    };
    Some(name)
}

/// End of a Python `def`/`class` header: the line whose colon closes it once
/// brackets balance. Returns the line and whether the body continues on it.
pub fn python_header_end(lines: &[&str], idx: usize, rules: &LanguageRules) -> (usize, bool) {
    let mut depth = 0i32;

    for (li, line) in lines.iter().enumerate().skip(idx).take(MAX_SIGNATURE_LINES) {
        let code = code_part(line, rules);
        for c in code.chars() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }
        if depth > 0 {
            continue;
        }
        let t = code.trim_end();
        if t.ends_with('\\') || !t.contains(':') {
            continue;
        }
        return (li, !t.ends_with(':'));
    }
    (idx, false)
}

/// Text following the header colon of an inline Python body
pub fn python_inline_body<'a>(line: &'a str, rules: &LanguageRules) -> &'a str {
    let code = code_part(line, rules);
    let mut depth = 0i32;
    for (pos, c) in code.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ':' if depth == 0 => return line[pos + 1..].trim(),
            _ => {}
        }
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::rules;

    fn params(language: Language, src: &str) -> Vec<String> {
        let lines: Vec<&str> = src.lines().collect();
        let r = rules(language);
        let (_, caps) = r.match_declaration(lines[0]).expect("declaration");
        let from = caps.name("name").map(|m| m.end()).unwrap_or(0);
        parameters(&lines, 0, from, r, language).0
    }

    #[test]
    fn test_mask_strings_keeps_offsets() {
        let r = rules(Language::JavaScript);
        let line = r#"const glob = "src/**/*.js"; // note"#;
        let masked = mask_strings(line, r);
        assert_eq!(masked.len(), line.len());
        assert!(!masked.contains("/*"));
        assert_eq!(code_part(line, r).trim_end(), r#"const glob = "           ";"#);
    }

    #[test]
    fn test_mask_rust_char_literals() {
        let r = rules(Language::Rust);
        let masked = mask_strings("fn f<'a>(c: char) -> bool { c == '{' }", r);
        assert_eq!(masked.matches('{').count(), 1);
        assert!(masked.contains("<'a>"));
    }

    #[test]
    fn test_python_params() {
        assert_eq!(params(Language::Python, "def add(a, b):"), vec!["a", "b"]);
        assert_eq!(
            params(Language::Python, "def run(self, *args, key: str = 'x', **kw) -> None:"),
            vec!["args", "key", "kw"]
        );
        assert_eq!(
            params(Language::Python, "def build(\n    name,\n    size=(1, 2),\n):"),
            vec!["name", "size"]
        );
    }

    #[test]
    fn test_js_params() {
        assert_eq!(
            params(Language::JavaScript, "function render({ a, b }, ...rest) {"),
            vec!["options", "rest"]
        );
        assert_eq!(
            params(Language::TypeScript, "function get<T>(key: string, fallback?: T): T {"),
            vec!["key", "fallback"]
        );
        assert_eq!(params(Language::JavaScript, "const sum = (a, b) => a + b;"), vec!["a", "b"]);
    }

    #[test]
    fn test_rust_params() {
        assert_eq!(
            params(Language::Rust, "pub fn insert<K: Fn(u8) -> u8>(&mut self, mut key: K, map: HashMap<String, u8>) {"),
            vec!["key", "map"]
        );
        assert!(params(Language::Rust, "fn new() -> Self {").is_empty());
    }

    #[test]
    fn test_python_header_end() {
        let r = rules(Language::Python);
        let lines = vec!["def f(", "    a: int,", ") -> int:", "    return a"];
        assert_eq!(python_header_end(&lines, 0, r), (2, false));

        let lines = vec!["def f(): return 1"];
        assert_eq!(python_header_end(&lines, 0, r), (0, true));

        let lines = vec!["class A:  # base"];
        assert_eq!(python_header_end(&lines, 0, r), (0, false));
    }

    #[test]
    fn test_python_inline_body() {
        let r = rules(Language::Python);
        assert_eq!(python_inline_body("def f(x: int): return x", r), "return x");
    }

    #[test]
    fn test_starts_with_string() {
        assert!(starts_with_string("\"\"\"Doc.\"\"\""));
        assert!(starts_with_string("r'''raw'''"));
        assert!(!starts_with_string("return 'x'"));
        assert!(starts_with_string("f\"\"\"{x}\"\"\""));
    }

    #[test]
    fn test_starts_with_docstring() {
        assert!(starts_with_docstring("\"\"\"Doc.\"\"\""));
        assert!(starts_with_docstring("r'''raw'''"));
        assert!(!starts_with_docstring("f\"\"\"not a doc\"\"\""));
        assert!(!starts_with_docstring("Rf'x'"));
    }
}
