pub mod error;

pub use error::{DocError, ErrorCategory, ErrorClassifier, LlmError, Result};
