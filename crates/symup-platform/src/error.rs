//! Common error types for symup-platform.

use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unsupported host platform: '{0}'")]
    UnsupportedHost(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
