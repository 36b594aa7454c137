//! Deadline helpers for generation requests.
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let text = with_timeout(
//!     Duration::from_secs(30),
//!     async { provider.generate(&prompt).await },
//!     "doc generation",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::constants::network as net_constants;
use crate::types::{DocError, Result};

/// Default deadline for a single generation request
pub fn default_request_timeout() -> Duration {
    Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS)
}

/// Execute an async operation with a timeout
///
/// Returns [`DocError::Timeout`] if the operation doesn't complete within the
/// specified duration. The inner future is dropped at the deadline.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DocError::timeout(operation_name, timeout)),
    }
}
