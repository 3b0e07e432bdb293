//! Host platform detection.

use crate::{PlatformError, PlatformResult};
use symup_core::Platform;
use tracing::debug;

/// Platform of the machine symup is running on.
pub fn detect_host() -> PlatformResult<Platform> {
    let platform = platform_from_os(std::env::consts::OS)?;
    debug!(%platform, "Detected host platform");
    Ok(platform)
}

/// Map a `std::env::consts::OS` value to a supported platform.
pub fn platform_from_os(os: &str) -> PlatformResult<Platform> {
    match os {
        "linux" => Ok(Platform::Linux),
        "windows" => Ok(Platform::Windows),
        "macos" => Ok(Platform::Macos),
        other => Err(PlatformError::UnsupportedHost(other.to_string())),
    }
}
