//! doccov - Documentation Coverage for Source Files
//!
//! Finds the documentable constructs in a source file (functions, classes,
//! module headers, markup sections, stylesheet rules), reports which of them
//! carry a language-appropriate doc comment, and inserts doc blocks for the
//! ones that do not.
//!
//! ## Quick Start
//!
//! ```
//! use doccov::{Language, analyze, improve};
//!
//! let report = analyze("def foo():\n    pass\n", Language::Python)?;
//! assert_eq!(report.coverage, 0.0);
//!
//! let result = improve("def foo():\n    pass\n", Language::Python)?;
//! assert_eq!(analyze(&result.modified, Language::Python)?.coverage, 1.0);
//! # Ok::<(), doccov::DocError>(())
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: language rules, construct detection, coverage reports
//! - [`improver`]: doc block templates, rendering and insertion
//! - [`ai`]: optional LLM providers behind the improver's generator seam
//! - [`config`]: layered configuration
//! - [`cli`]: command implementations for the `doccov` binary

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod improver;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use analyzer::{
    AnalysisReport, AnalyzerOptions, CommentAnalyzer, Construct, ConstructKind, FileScanner,
    Language, SourceUnit, analyze, analyze_with_extension,
};
pub use improver::{DocGenerator, ImprovementResult, Improver, improve};

pub use config::{Config, ConfigLoader, OutputFormat};

pub use types::error::{DocError, ErrorCategory, LlmError, Result};

pub use ai::{LlmProvider, ProviderConfig, ProviderGenerator, with_timeout};
