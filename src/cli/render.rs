//! Report rendering for the CLI: styled text, JSON or YAML.

use console::style;
use serde::Serialize;

use super::commands::coverage::CoverageSummary;
use super::ui::coverage_style;
use crate::analyzer::AnalysisReport;
use crate::config::OutputFormat;
use crate::types::Result;

const RULE: &str = "──────────────────────────────────────";

/// Print rendered output to stdout with exactly one trailing newline
pub fn emit(rendered: &str) {
    println!("{}", rendered.trim_end_matches('\n'));
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

/// Render a single-file analysis report
pub fn report(path: &str, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    let wrapped = FileReport { path, report };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&wrapped)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&wrapped)?),
        OutputFormat::Text => Ok(report_text(path, report)),
    }
}

fn report_text(path: &str, report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n{}\n", style(path).bold(), report.language, RULE));

    let width = report
        .constructs
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);
    for c in &report.constructs {
        let mark = if c.has_doc {
            style("✓").green()
        } else {
            style("✗").red()
        };
        out.push_str(&format!(
            "  {} {:<13} {:<width$}  line {}\n",
            mark,
            c.kind.as_str(),
            c.name,
            c.line
        ));
    }

    if report.total == 0 {
        out.push_str("  (no documentable constructs)\n");
    }
    out.push_str(&format!(
        "Coverage: {}/{} documented ({})\n",
        report.documented,
        report.total,
        coverage_style(report.coverage)
    ));

    if !report.complex_functions.is_empty() {
        out.push_str("\nComplex functions:\n");
        for f in &report.complex_functions {
            out.push_str(&format!(
                "  {} (line {}): complexity {}\n",
                f.name, f.line, f.complexity
            ));
        }
    }

    if !report.inline_suggestions.is_empty() {
        out.push_str("\nInline comment suggestions:\n");
        for s in &report.inline_suggestions {
            out.push_str(&format!("  line {}: {}\n", s.line, s.message));
        }
    }
    out
}

/// Render a directory coverage summary
pub fn summary(summary: &CoverageSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(summary)?),
        OutputFormat::Text => Ok(summary_text(summary)),
    }
}

fn summary_text(summary: &CoverageSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n{}\n",
        style(format!("Documentation coverage: {}", summary.root)).bold(),
        RULE
    ));

    let width = summary
        .files
        .iter()
        .map(|f| f.path.chars().count())
        .max()
        .unwrap_or(0);
    for f in &summary.files {
        out.push_str(&format!(
            "  {:<width$}  {:>4}/{:<4} {}\n",
            f.path,
            f.documented,
            f.total,
            coverage_style(f.coverage)
        ));
    }

    if !summary.skipped.is_empty() {
        out.push_str(&format!("\nSkipped {} file(s):\n", summary.skipped.len()));
        for s in &summary.skipped {
            out.push_str(&format!("  {}: {}\n", s.path, s.reason));
        }
    }

    out.push_str(&format!(
        "\nTotal: {}/{} documented across {} file(s) ({})\n",
        summary.documented,
        summary.total,
        summary.files.len(),
        coverage_style(summary.coverage)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Language, analyze};
    use crate::cli::commands::coverage::{FileCoverage, SkippedFile};

    fn sample() -> AnalysisReport {
        analyze(
            "def documented():\n    \"\"\"Yes.\"\"\"\n    pass\n\ndef bare(x):\n    return x\n",
            Language::Python,
        )
        .unwrap()
    }

    #[test]
    fn test_text_report_lists_constructs() {
        let text = report("app.py", &sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("app.py"));
        assert!(text.contains("(Python)"));
        assert!(text.contains("documented"));
        assert!(text.contains("line 5"));
        assert!(text.contains("Coverage: 1/2 documented"));
        assert!(text.contains("50.0%"));
    }

    #[test]
    fn test_json_report_is_flat() {
        let json = report("app.py", &sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["path"], "app.py");
        assert_eq!(value["total"], 2);
        assert_eq!(value["constructs"][1]["name"], "bare");
    }

    #[test]
    fn test_yaml_report() {
        let yaml = report("app.py", &sample(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("path: app.py"));
        assert!(yaml.contains("documented: 1"));
    }

    #[test]
    fn test_empty_report_text() {
        let empty = analyze("", Language::Rust).unwrap();
        let text = report("lib.rs", &empty, OutputFormat::Text).unwrap();
        assert!(text.contains("no documentable constructs"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_summary_text() {
        let summary = CoverageSummary {
            root: "src".to_string(),
            files: vec![FileCoverage {
                path: "a.py".to_string(),
                language: Language::Python,
                total: 4,
                documented: 3,
                coverage: 0.75,
            }],
            skipped: vec![SkippedFile {
                path: "bad.py".to_string(),
                reason: "Malformed input: content is not valid UTF-8".to_string(),
            }],
            total: 4,
            documented: 3,
            coverage: 0.75,
        };
        let text = summary_text(&summary);
        assert!(text.contains("Documentation coverage: src"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("Skipped 1 file(s)"));
        assert!(text.contains("bad.py: Malformed input"));
        assert!(text.contains("3/4 documented across 1 file(s)"));
    }
}
