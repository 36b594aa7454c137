//! Coverage Command
//!
//! Aggregate documentation coverage over a directory tree.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzer::{CommentAnalyzer, FileScanner, Language, SourceUnit, coverage_ratio};
use crate::cli::render;
use crate::config::{AnalysisConfig, ConfigLoader, OutputFormat};
use crate::types::{DocError, Result};

#[derive(Debug, Clone)]
pub struct CoverageOptions {
    pub dir: PathBuf,
    pub format: Option<OutputFormat>,
    /// Minimum aggregate coverage in percent
    pub min: Option<f64>,
    pub module_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub path: String,
    pub language: Language,
    pub total: usize,
    pub documented: usize,
    pub coverage: f64,
}

/// A file the walk found but could not analyze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub root: String,
    pub files: Vec<FileCoverage>,
    pub skipped: Vec<SkippedFile>,
    pub total: usize,
    pub documented: usize,
    pub coverage: f64,
}

pub fn run(options: CoverageOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    let mut analysis = config.analysis.clone();
    analysis.module_header |= options.module_header;

    let summary = collect(&options.dir, &analysis);
    let format = options.format.unwrap_or(config.output.format);
    render::emit(&render::summary(&summary, format)?);

    check_minimum(&summary, options.min)
}

/// Analyze every supported file under `root`
pub fn collect(root: &Path, analysis: &AnalysisConfig) -> CoverageSummary {
    let scanner = FileScanner::new(root)
        .with_exclude(analysis.exclude.clone())
        .with_max_file_size(analysis.max_file_size);
    let analyzer = CommentAnalyzer::new(analysis.options());

    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for file in scanner.scan() {
        let source = Language::from_extension(&file.extension)
            .and_then(|lang| SourceUnit::from_path(&file.path, Some(lang)));
        match source {
            Ok(source) => {
                let report = analyzer.analyze(&source);
                files.push(FileCoverage {
                    path: file.relative,
                    language: report.language,
                    total: report.total,
                    documented: report.documented,
                    coverage: report.coverage,
                });
            }
            Err(e) => {
                warn!(path = %file.relative, "Skipping file: {}", e);
                skipped.push(SkippedFile {
                    path: file.relative,
                    reason: e.to_string(),
                });
            }
        }
    }

    let total: usize = files.iter().map(|f| f.total).sum();
    let documented: usize = files.iter().map(|f| f.documented).sum();
    info!(
        files = files.len(),
        skipped = skipped.len(),
        total,
        documented,
        "Coverage collected"
    );

    CoverageSummary {
        root: root.display().to_string(),
        files,
        skipped,
        total,
        documented,
        coverage: coverage_ratio(documented, total),
    }
}

/// Fail when aggregate coverage (percent) is under `min`
pub fn check_minimum(summary: &CoverageSummary, min: Option<f64>) -> Result<()> {
    match min {
        Some(required) if summary.coverage * 100.0 < required => {
            Err(DocError::CoverageBelowThreshold {
                actual: summary.coverage * 100.0,
                required,
            })
        }
        _ => Ok(()),
    }
}
