//! Version identifier sent to the upload backend.

use crate::Platform;

pub const VERSION_SEPARATOR: &str = "-";
pub const MULTIBUNDLE_SUFFIX: &str = "multibundle";

/// Assemble the version key, e.g. `1_1_0-gf4373acf9-Qt_6_10-macos-multibundle`.
pub fn build_version(
    app_version: &str,
    git_hash: &str,
    qt_version: &str,
    platform: Platform,
    multibundle: bool,
) -> String {
    let mut parts = vec![app_version, git_hash, qt_version, platform.as_str()];
    if multibundle {
        parts.push(MULTIBUNDLE_SUFFIX);
    }
    parts.join(VERSION_SEPARATOR)
}
