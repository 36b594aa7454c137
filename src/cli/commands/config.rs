//! Config Command
//!
//! Usage:
//!   doccov config show [-f toml|json]
//!   doccov config path
//!   doccov config init [-g] [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{DocError, Result};

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(DocError::Config(format!(
                "Unknown config format: {}. Valid values: toml, json",
                other
            )));
        }
    };
    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, as_json)?.trim_end());
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    print!("{}", ConfigLoader::describe_paths());
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(&std::env::current_dir()?, force)?
    };

    let out = Output::new();
    out.success(&format!(
        "Initialized {} configuration",
        if global { "global" } else { "project" }
    ));
    out.info(&format!("Config: {}", path.display()));
    Ok(())
}
