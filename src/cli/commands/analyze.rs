//! Analyze Command
//!
//! Reports which constructs in one file carry documentation.

use std::path::PathBuf;

use tracing::info;

use crate::analyzer::{CommentAnalyzer, Language, SourceUnit};
use crate::cli::render;
use crate::config::{Config, ConfigLoader, OutputFormat};
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub file: PathBuf,
    /// Overrides extension-based detection
    pub language: Option<Language>,
    pub format: Option<OutputFormat>,
    pub module_header: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    render::emit(&analyze_file(&options, &config)?);
    Ok(())
}

/// Analyze and render without touching stdout
pub fn analyze_file(options: &AnalyzeOptions, config: &Config) -> Result<String> {
    let mut analysis = config.analysis.options();
    analysis.module_header |= options.module_header;

    let source = SourceUnit::from_path(&options.file, options.language)?;
    let report = CommentAnalyzer::new(analysis).analyze(&source);
    info!(
        file = %options.file.display(),
        total = report.total,
        documented = report.documented,
        "Analyzed"
    );

    render::report(
        &options.file.display().to_string(),
        &report,
        options.format.unwrap_or(config.output.format),
    )
}
