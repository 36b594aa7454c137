//! Bridges an async [`LlmProvider`] to the improver's synchronous
//! [`DocGenerator`] seam.

use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::provider::{ProviderConfig, SharedProvider, create_provider, prompt_utils};
use super::timeout::with_timeout;
use crate::improver::{DocGenerator, GenerationRequest};
use crate::types::{ErrorClassifier, Result};

/// Runs each request on a private current-thread runtime under a deadline
pub struct ProviderGenerator {
    provider: SharedProvider,
    timeout: Duration,
    runtime: Runtime,
}

impl ProviderGenerator {
    pub fn new(provider: SharedProvider, timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            provider,
            timeout,
            runtime,
        })
    }

    /// Build from configuration; `None` when generation is disabled
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>> {
        match create_provider(config)? {
            Some(provider) => Ok(Some(Self::new(provider, config.timeout())?)),
            None => Ok(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl DocGenerator for ProviderGenerator {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let prompt = prompt_utils::doc_prompt(request);
        let response = self
            .runtime
            .block_on(with_timeout(
                self.timeout,
                self.provider.generate(&prompt),
                "doc generation",
            ))
            .map_err(|e| ErrorClassifier::classify_doc_error(&e, self.provider.name()))?;

        debug!(
            provider = self.provider.name(),
            model = %response.model,
            tokens = response.usage.total(),
            elapsed_ms = response.elapsed.as_millis() as u64,
            "Generated doc text for {}",
            request.name
        );
        Ok(response.content)
    }
}
