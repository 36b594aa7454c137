//! AI Integration Layer
//!
//! Optional LLM-backed doc text. The core improver never depends on this
//! module; it only sees the [`DocGenerator`](crate::improver::DocGenerator)
//! implemented by [`ProviderGenerator`].

pub mod generator;
pub mod provider;
pub mod timeout;

pub use generator::ProviderGenerator;
pub use provider::{
    ErrorCategory, ErrorClassifier, LlmError, LlmProvider, LlmResponse, OllamaProvider,
    OpenAiProvider, ProviderConfig, SharedProvider, TokenUsage, create_provider,
};
pub use timeout::with_timeout;
