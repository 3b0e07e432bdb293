//! symup-platform: host I/O boundary for symup.
//!
//! This crate provides:
//! - Host platform detection
//! - Uploader process spawning via `std::process`
//! - A dry-run runner that logs instead of spawning
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `host` - Host platform detection
//! - `runner` - `CommandRunner` implementations

mod error;
mod host;
mod runner;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export host detection
pub use host::{detect_host, platform_from_os};

// Re-export runners
pub use runner::{NoopRunner, ProcessRunner};
