//! Templated documentation derived from construct names.
//!
//! The summary comes from the name split on `_` and camelCase boundaries,
//! with a handful of verb prefixes mapped onto fixed phrasings. Functions
//! list their parameters and (when they return a value) a returns section;
//! Python classes list their methods.

use crate::analyzer::{Construct, ConstructKind, Language};

/// Body lines of the doc block for a construct, without comment markers
pub fn template(construct: &Construct, language: Language) -> Vec<String> {
    match construct.kind {
        ConstructKind::Function => function_doc(construct, language),
        ConstructKind::Class => class_doc(construct, language),
        ConstructKind::ModuleHeader => vec![module_summary(language, &construct.name)],
        ConstructKind::Section => vec![format!(
            "{} section: {}",
            construct.keyword.to_uppercase(),
            construct.name
        )],
        ConstructKind::Rule => vec![format!("Styles for {}", construct.name)],
    }
}

fn function_doc(c: &Construct, language: Language) -> Vec<String> {
    let mut out = vec![summary(&c.name, language)];

    match language {
        Language::Python => {
            if !c.params.is_empty() {
                out.push(String::new());
                out.push("Args:".to_string());
                out.extend(c.params.iter().map(|p| format!("    {p}: Description of {p}")));
            }
            if c.returns_value {
                out.push(String::new());
                out.push("Returns:".to_string());
                out.push("    Description of return value".to_string());
            }
        }
        Language::JavaScript | Language::TypeScript => {
            if !c.params.is_empty() || c.returns_value {
                out.push(String::new());
            }
            out.extend(
                c.params
                    .iter()
                    .map(|p| format!("@param {{any}} {p} - Description of {p}")),
            );
            if c.returns_value {
                out.push("@returns {any} Description of return value".to_string());
            }
        }
        Language::Rust => {
            if !c.params.is_empty() {
                out.push(String::new());
                out.push("# Arguments".to_string());
                out.push(String::new());
                out.extend(c.params.iter().map(|p| format!("* `{p}` - Description of {p}")));
            }
            if c.returns_value {
                out.push(String::new());
                out.push("# Returns".to_string());
                out.push(String::new());
                out.push("Description of return value".to_string());
            }
        }
        Language::Html | Language::Css => {}
    }
    out
}

fn class_doc(c: &Construct, language: Language) -> Vec<String> {
    let words = humanize(&c.name);
    match (language, c.keyword.as_str()) {
        (Language::Python, _) => {
            let mut out = vec![format!("Class for {words}.")];
            if !c.members.is_empty() {
                out.push(String::new());
                out.push("This class provides the following methods:".to_string());
                out.extend(c.members.iter().map(|m| format!("    - {m}")));
            }
            out
        }
        (Language::TypeScript, "interface") => vec![format!("Interface describing a {}.", c.name)],
        (Language::Rust, "enum") => vec![format!("Possible {words} variants.")],
        (Language::Rust, "trait") => vec![format!("Behaviour shared by {words} implementors.")],
        (Language::Rust, "union") => vec![format!("Union of {words} representations.")],
        (Language::Rust, _) => vec![format!("Data structure for {words}.")],
        _ => vec![format!("Class representing a {}.", c.name)],
    }
}

fn module_summary(language: Language, name: &str) -> String {
    let subject = (name != "module").then(|| humanize(name));
    match language {
        Language::Python => format!(
            "Python module for handling {} functionality.",
            subject.as_deref().unwrap_or("code")
        ),
        Language::JavaScript | Language::TypeScript => format!(
            "{} module providing {} functionality.",
            language,
            subject.as_deref().unwrap_or("client-side")
        ),
        Language::Rust => format!(
            "Rust module providing {} functionality.",
            subject.as_deref().unwrap_or("core")
        ),
        Language::Html => match subject {
            Some(s) => format!("HTML template for the {s} page structure."),
            None => "HTML template for webpage structure.".to_string(),
        },
        Language::Css => format!(
            "CSS stylesheet for styling the {}.",
            subject.as_deref().unwrap_or("application")
        ),
    }
}

/// One-sentence summary of a function from its name
pub fn summary(name: &str, language: Language) -> String {
    match name {
        "main" => return "Entry point of the program.".to_string(),
        "__init__" | "constructor" => return "Initialize the object.".to_string(),
        "new" if language == Language::Rust => return "Create a new instance.".to_string(),
        _ => {}
    }

    let words = split_words(name);
    let Some((verb, rest)) = words.split_first() else {
        return "Undocumented function.".to_string();
    };
    let rest = rest.join(" ");

    if !rest.is_empty() {
        let phrase = match verb.as_str() {
            "get" => Some(format!("Get the {rest}.")),
            "set" => Some(format!("Set the {rest}.")),
            "is" => Some(format!("Check if {rest}.")),
            "has" => Some(format!("Check if it has {rest}.")),
            "calculate" | "calc" => Some(format!("Calculate the {rest}.")),
            "validate" => Some(format!("Validate the {rest}.")),
            "create" => Some(format!("Create a new {rest}.")),
            "update" => Some(format!("Update the {rest}.")),
            "delete" | "remove" => Some(format!("Delete the {rest}.")),
            _ => None,
        };
        if let Some(phrase) = phrase {
            return phrase;
        }
    }

    format!("{}.", capitalize(&words.join(" ")))
}

/// Lowercase words of an identifier: `getUserName` → `get user name`
pub fn humanize(name: &str) -> String {
    let words = split_words(name);
    if words.is_empty() {
        name.to_string()
    } else {
        words.join(" ")
    }
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.into_iter().map(|w| w.to_lowercase()).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, params: &[&str], returns_value: bool) -> Construct {
        let mut c = Construct::new(ConstructKind::Function, name, 1);
        c.params = params.iter().map(|p| p.to_string()).collect();
        c.returns_value = returns_value;
        c
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("getUserName"), vec!["get", "user", "name"]);
        assert_eq!(split_words("parse_HTTPResponse"), vec!["parse", "http", "response"]);
        assert_eq!(split_words("_private_helper"), vec!["private", "helper"]);
        assert_eq!(split_words("v2Parser"), vec!["v2", "parser"]);
    }

    #[test]
    fn test_summary_verbs() {
        let py = Language::Python;
        assert_eq!(summary("get_user", py), "Get the user.");
        assert_eq!(summary("isValid", py), "Check if valid.");
        assert_eq!(summary("has_children", py), "Check if it has children.");
        assert_eq!(summary("calc_total_price", py), "Calculate the total price.");
        assert_eq!(summary("removeItem", py), "Delete the item.");
        assert_eq!(summary("main", py), "Entry point of the program.");
        assert_eq!(summary("__init__", py), "Initialize the object.");
        assert_eq!(summary("new", Language::Rust), "Create a new instance.");
        assert_eq!(summary("load_config", py), "Load config.");
        assert_eq!(summary("get", py), "Get.");
        assert_eq!(summary("_", py), "Undocumented function.");
    }

    #[test]
    fn test_python_function_template() {
        let c = function("add", &["a", "b"], true);
        assert_eq!(
            template(&c, Language::Python),
            vec![
                "Add.",
                "",
                "Args:",
                "    a: Description of a",
                "    b: Description of b",
                "",
                "Returns:",
                "    Description of return value",
            ]
        );
    }

    #[test]
    fn test_js_function_template() {
        let c = function("fetchUser", &["id"], true);
        assert_eq!(
            template(&c, Language::JavaScript),
            vec![
                "Fetch user.",
                "",
                "@param {any} id - Description of id",
                "@returns {any} Description of return value",
            ]
        );
        assert_eq!(template(&function("noop", &[], false), Language::JavaScript), vec!["Noop."]);
    }

    #[test]
    fn test_class_templates() {
        let mut c = Construct::new(ConstructKind::Class, "ShoppingCart", 1).with_keyword("class");
        c.members = vec!["add".to_string(), "total".to_string()];
        assert_eq!(
            template(&c, Language::Python),
            vec![
                "Class for shopping cart.",
                "",
                "This class provides the following methods:",
                "    - add",
                "    - total",
            ]
        );
        assert_eq!(
            template(&c, Language::JavaScript),
            vec!["Class representing a ShoppingCart."]
        );

        let e = Construct::new(ConstructKind::Class, "TokenKind", 1).with_keyword("enum");
        assert_eq!(template(&e, Language::Rust), vec!["Possible token kind variants."]);
    }

    #[test]
    fn test_markup_templates() {
        let s = Construct::new(ConstructKind::Section, "main-nav", 1).with_keyword("nav");
        assert_eq!(template(&s, Language::Html), vec!["NAV section: main-nav"]);

        let r = Construct::new(ConstructKind::Rule, ".card > h2", 1).with_keyword("rule");
        assert_eq!(template(&r, Language::Css), vec!["Styles for .card > h2"]);
    }

    #[test]
    fn test_module_summaries() {
        let named = Construct::new(ConstructKind::ModuleHeader, "user_store", 1);
        assert_eq!(
            template(&named, Language::Python),
            vec!["Python module for handling user store functionality."]
        );

        let anonymous = Construct::new(ConstructKind::ModuleHeader, "module", 1);
        assert_eq!(
            template(&anonymous, Language::Css),
            vec!["CSS stylesheet for styling the application."]
        );
        assert_eq!(
            template(&anonymous, Language::Html),
            vec!["HTML template for webpage structure."]
        );
    }
}
