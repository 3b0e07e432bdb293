//! symup-core: target catalog, artifact resolution and upload dispatch.
//!
//! Design goal: keep this crate host-agnostic and process-agnostic.
//! Host detection and process spawning live in `symup-platform`.

mod catalog;
mod credentials;
mod error;
mod pipeline;
mod redact;
mod resolve;
mod upload;
mod version;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use credentials::{Credentials, EnvSource, ProcessEnv};
pub use error::{AuthError, ConfigError, UploadError};
pub use pipeline::{FailedUpload, FailurePolicy, MissingTarget, Pipeline, RunSummary};
pub use redact::{redact, CREDENTIAL_FLAGS, REDACTED};
pub use resolve::{ResolvedArtifact, Resolver};
pub use upload::{CommandRunner, Invocation, ProcessOutput, Uploader, DEFAULT_UPLOADER};
pub use version::{build_version, MULTIBUNDLE_SUFFIX, VERSION_SEPARATOR};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the upload-service database name.
pub const DATABASE_ENV: &str = "BUGSPLAT_DATABASE";

/// A supported build platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    Macos,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Windows, Platform::Macos];

    /// Canonical lower-case name, used in the version identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Macos => "macos",
        }
    }

    /// Suffix of the debug artifact produced on this platform.
    pub fn debug_suffix(&self) -> &'static str {
        match self {
            Platform::Linux => ".debug",
            Platform::Windows => ".pdb",
            Platform::Macos => ".dSYM",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" | "darwin" => Ok(Platform::Macos),
            other => Err(ConfigError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// One uploadable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Identifier the upload backend knows the application by.
    pub application: String,
    pub locator: Locator,
}

/// How a target is found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Exact file or bundle name.
    Exact {
        filename: String,
        is_dir: bool,
        /// Selector handed to the uploader once the artifact is found.
        files_glob: String,
    },
    /// Versioned artifact, e.g. `libQMUParserLib.so.2.7.0.debug`.
    /// Matches any file starting with the prefix and ending in the platform debug suffix.
    Prefix { filename_prefix: String },
}

impl Target {
    pub fn exact(application: &str, filename: &str, is_dir: bool) -> Self {
        Self {
            application: application.into(),
            locator: Locator::Exact {
                filename: filename.into(),
                is_dir,
                files_glob: filename.into(),
            },
        }
    }

    pub fn prefix(application: &str, filename_prefix: &str) -> Self {
        Self {
            application: application.into(),
            locator: Locator::Prefix { filename_prefix: filename_prefix.into() },
        }
    }

    /// Human-readable description of what is searched for, e.g. `libQMUParserLib*.debug`.
    pub fn search_label(&self, platform: Platform) -> String {
        match &self.locator {
            Locator::Exact { filename, .. } => filename.clone(),
            Locator::Prefix { filename_prefix } => {
                format!("{}*{}", filename_prefix, platform.debug_suffix())
            }
        }
    }
}
