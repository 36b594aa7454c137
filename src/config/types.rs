//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::ai::ProviderConfig;
use crate::analyzer::AnalyzerOptions;
use crate::constants::{analysis, network};
use crate::types::{DocError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Construct detection settings
    pub analysis: AnalysisConfig,

    /// Optional LLM provider for doc text
    pub llm: LlmConfig,

    /// Report rendering
    pub output: OutputConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DocError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(DocError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.analysis.complexity_threshold == 0 {
            return Err(DocError::Config(
                "Analysis complexity_threshold must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.llm.provider.as_str(), "none" | "openai" | "ollama") {
            return Err(DocError::Config(format!(
                "Unknown LLM provider '{}'. Valid values: none, openai, ollama",
                self.llm.provider
            )));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                DocError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Count the file's leading summary as a construct
    pub module_header: bool,

    /// Functions above this complexity are reported
    pub complexity_threshold: u32,

    /// Report inline comment suggestions
    pub inline_suggestions: bool,

    /// Extra glob patterns skipped by `coverage`
    pub exclude: Vec<String>,

    /// Files larger than this (bytes) are skipped by `coverage`
    pub max_file_size: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            module_header: false,
            complexity_threshold: analysis::DEFAULT_COMPLEXITY_THRESHOLD,
            inline_suggestions: true,
            exclude: Vec::new(),
            max_file_size: analysis::MAX_FILE_SIZE,
        }
    }
}

impl AnalysisConfig {
    pub fn options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            module_header: self.module_header,
            complexity_threshold: self.complexity_threshold,
            inline_suggestions: self.inline_suggestions,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: none, openai, ollama
    pub provider: String,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// Deadline for one generation request in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation (0.0 = deterministic)
    pub temperature: f32,

    /// Custom endpoint
    pub api_base: Option<String>,

    /// Never written back out; `OPENAI_API_KEY` is used when unset
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub max_tokens: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "none".to_string(),
            model: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
            api_base: None,
            api_key: None,
            max_tokens: 512,
        }
    }
}

impl LlmConfig {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: text, json, yaml",
                s
            )),
        }
    }
}
