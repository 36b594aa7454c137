//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Construct analysis constants
pub mod analysis {
    /// Functions whose complexity exceeds this are reported as complex
    pub const DEFAULT_COMPLEXITY_THRESHOLD: u32 = 5;

    /// Maximum lines a declaration header may span before we stop looking
    /// for its end (multi-line parameter lists)
    pub const MAX_SIGNATURE_LINES: usize = 50;

    /// Maximum file size considered by directory coverage (1MB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;
}

/// Doc stub generation constants
pub mod generation {
    /// Lines of source around a construct handed to an external generator
    pub const CONTEXT_LINES: usize = 20;

    /// Maximum characters of generated text accepted as a doc block
    pub const MAX_GENERATED_CHARS: usize = 2_000;
}

/// HTTP/Network constants
pub mod network {
    /// Default deadline for one doc generation request (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}
