//! Improve Command
//!
//! Inserts doc blocks for undocumented constructs, optionally with text
//! from an LLM provider.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::ai::ProviderGenerator;
use crate::analyzer::{Language, SourceUnit};
use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::improver::{ImprovementResult, Improver};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct ImproveOptions {
    pub file: PathBuf,
    /// Destination; the input file is rewritten when absent
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub language: Option<Language>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub module_header: bool,
    pub quiet: bool,
}

pub fn run(options: ImproveOptions) -> Result<()> {
    execute(&options, ConfigLoader::load()?)
}

/// Improve, then write or print the result
pub fn execute(options: &ImproveOptions, config: Config) -> Result<()> {
    let config = apply_overrides(config, options);
    config.validate()?;

    let result = improve_file(options, &config)?;
    let out = Output::quiet(options.quiet);

    if options.dry_run {
        print!("{}", result.modified);
    } else if result.is_changed() || options.output.is_some() {
        let target = options.output.as_ref().unwrap_or(&options.file);
        fs::write(target, &result.modified)?;
        info!(path = %target.display(), "Wrote improved source");
    }

    if result.is_changed() {
        out.success(&format!(
            "Inserted {} doc block(s) ({} generated, {} from templates)",
            result.improved.len(),
            result.generated_count(),
            result.improved.len() - result.generated_count()
        ));
    } else {
        out.info("Nothing to improve: every construct is documented");
    }
    Ok(())
}

/// CLI flags win over every configuration layer
pub fn apply_overrides(mut config: Config, options: &ImproveOptions) -> Config {
    if let Some(provider) = &options.provider {
        config.llm.provider = provider.clone();
    }
    if options.model.is_some() {
        config.llm.model = options.model.clone();
    }
    if let Some(secs) = options.timeout_secs {
        config.llm.timeout_secs = secs;
    }
    config.analysis.module_header |= options.module_header;
    config
}

/// Improve one file in memory
pub fn improve_file(options: &ImproveOptions, config: &Config) -> Result<ImprovementResult> {
    let source = SourceUnit::from_path(&options.file, options.language)?;

    let mut improver = Improver::new(config.analysis.options());
    if let Some(generator) = ProviderGenerator::from_config(&config.llm.provider_config())? {
        info!(
            provider = config.llm.provider.as_str(),
            timeout_secs = generator.timeout().as_secs(),
            "Using LLM provider for doc text"
        );
        improver = improver.with_generator(Box::new(generator));
    }

    let result = improver.improve(&source);
    let fallbacks = result.improved.len() - result.generated_count();
    if config.llm.provider != "none" && fallbacks > 0 {
        warn!("{} doc block(s) fell back to templates", fallbacks);
    }
    Ok(result)
}
