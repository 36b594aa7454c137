//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/doccov/config.toml)
//! 3. Project config (.doccov/config.toml)
//! 4. Environment variables (DOCCOV_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Resolution chain with explicit file locations; missing files are skipped
    pub fn load_from(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // DOCCOV_LLM_TIMEOUT_SECS -> llm.timeout_secs
        figment = figment.merge(
            Env::prefixed("DOCCOV_").map(|key| key.as_str().replacen('_', ".", 1).into()),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/doccov/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("doccov"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project config directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".doccov")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Describe where configuration is read from
    pub fn describe_paths() -> String {
        let mark = |p: &Path| if p.exists() { "✓" } else { "✗" };
        let mut out = String::from("Configuration paths:\n\n");

        match Self::global_config_path() {
            Some(global) => {
                out.push_str(&format!("  Global:  {} {}\n", mark(&global), global.display()))
            }
            None => out.push_str("  Global:  (not available)\n"),
        }

        let project = Self::project_config_path();
        out.push_str(&format!("  Project: {} {}\n", mark(&project), project.display()));
        out
    }

    /// Render an effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| DocError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the default global config; returns its path
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            DocError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir.join("config.toml"), &Self::default_global_config(), force)
    }

    /// Write the default project config under `root`; returns its path
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let path = root.join(Self::project_config_path());
        Self::write_default(&path, &Self::default_project_config(), force)
    }

    fn write_default(path: &Path, content: &str, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            return Err(DocError::Config(format!(
                "Config already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Created config: {}", path.display());
        Ok(path.to_path_buf())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_global_config() -> String {
        r#"# doccov Global Configuration
# User-wide defaults. Project settings in .doccov/config.toml override these.

# Optional LLM-backed doc text (templates are used when "none" or on failure)
[llm]
provider = "none"
timeout_secs = 30
temperature = 0.2
max_tokens = 512

[output]
format = "text"
"#
        .to_string()
    }

    fn default_project_config() -> String {
        r#"# doccov Project Configuration
# Project-specific settings that override global defaults.

[analysis]
module_header = false
complexity_threshold = 5
inline_suggestions = true
exclude = [
    "**/generated/**",
]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from(
            Some(&dir.path().join("global.toml")),
            &dir.path().join("project.toml"),
        )
        .unwrap();
        assert_eq!(config.analysis.complexity_threshold, 5);
        assert!(!config.analysis.module_header);
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[analysis]\ncomplexity_threshold = 9\nmodule_header = true\n[output]\nformat = \"json\"\n",
        )
        .unwrap();
        fs::write(&project, "[analysis]\ncomplexity_threshold = 3\n").unwrap();

        let config = ConfigLoader::load_from(Some(&global), &project).unwrap();
        assert_eq!(config.analysis.complexity_threshold, 3);
        assert!(config.analysis.module_header);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project.toml");
        fs::write(&project, "[llm]\ntemperature = 9.0\n").unwrap();
        assert!(ConfigLoader::load_from(None, &project).is_err());

        fs::write(&project, "[output]\nformat = \"xml\"\n").unwrap();
        assert!(ConfigLoader::load_from_file(&project).is_err());
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("DOCCOV_LLM_TIMEOUT_SECS", "7");
        }
        let config = ConfigLoader::load_from(None, &dir.path().join("none.toml"));
        unsafe {
            std::env::remove_var("DOCCOV_LLM_TIMEOUT_SECS");
        }
        assert_eq!(config.unwrap().llm.timeout_secs, 7);
    }

    #[test]
    fn test_init_project_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(dir.path(), false).unwrap();
        assert!(path.ends_with(".doccov/config.toml"));

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.analysis.exclude, vec!["**/generated/**"]);

        assert!(ConfigLoader::init_project(dir.path(), false).is_err());
        assert!(ConfigLoader::init_project(dir.path(), true).is_ok());
    }

    #[test]
    fn test_default_global_config_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_global_config()).unwrap();
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.provider, "none");
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[analysis]"));
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"complexity_threshold\": 5"));
    }
}
