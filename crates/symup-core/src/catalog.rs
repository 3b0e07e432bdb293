//! Target catalog: which debug artifacts are expected per platform.

use crate::{Locator, Platform, Target};
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// Embed the resources directory at compile time
static RESOURCES: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources");

const EMBEDDED_CATALOG: &str = "catalog.yaml";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("embedded resource '{0}' is missing or not UTF-8")]
    MissingResource(&'static str),
    #[error("invalid target '{application}' for {platform}: {reason}")]
    InvalidTarget {
        platform: Platform,
        application: String,
        reason: String,
    },
    #[error("platform '{0}' has no targets in the catalog")]
    UnsupportedPlatform(Platform),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Immutable per-platform table of targets. Built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    platforms: BTreeMap<Platform, Vec<Target>>,
    excluded: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    excluded: Vec<String>,
    platforms: BTreeMap<Platform, Vec<RawTarget>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    application: String,
    filename: Option<String>,
    #[serde(default)]
    is_dir: bool,
    files_glob: Option<String>,
    filename_prefix: Option<String>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn embedded() -> CatalogResult<Self> {
        let content = RESOURCES
            .get_file(EMBEDDED_CATALOG)
            .and_then(|f| f.contents_utf8())
            .ok_or(CatalogError::MissingResource(EMBEDDED_CATALOG))?;
        let catalog = Self::from_yaml(content)?;
        debug!("Loaded embedded catalog");
        Ok(catalog)
    }

    /// Load a catalog from a YAML file on disk.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&content)?;
        debug!(?path, "Loaded catalog");
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    pub fn from_yaml(content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        let excluded = file.excluded;

        let mut platforms = BTreeMap::new();
        for (platform, raw_targets) in file.platforms {
            let mut seen = HashSet::new();
            let mut targets = Vec::with_capacity(raw_targets.len());
            for raw in raw_targets {
                let target = raw.into_target(platform)?;
                if excluded.iter().any(|e| e == &target.application) {
                    return Err(invalid(platform, &target.application, "application is excluded"));
                }
                if !seen.insert(target.application.clone()) {
                    return Err(invalid(platform, &target.application, "duplicate application"));
                }
                targets.push(target);
            }
            platforms.insert(platform, targets);
        }

        Ok(Self { platforms, excluded })
    }

    /// Ordered targets for a platform.
    pub fn targets(&self, platform: Platform) -> CatalogResult<&[Target]> {
        self.platforms
            .get(&platform)
            .map(Vec::as_slice)
            .ok_or(CatalogError::UnsupportedPlatform(platform))
    }

    /// Applications that must never be uploaded.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }
}

impl RawTarget {
    fn into_target(self, platform: Platform) -> CatalogResult<Target> {
        let application = self.application.trim().to_string();
        if application.is_empty() {
            return Err(invalid(platform, "<unnamed>", "application must not be empty"));
        }

        let filename = self.filename.filter(|s| !s.trim().is_empty());
        let prefix = self.filename_prefix.filter(|s| !s.trim().is_empty());

        let locator = match (filename, prefix) {
            (Some(filename), None) => Locator::Exact {
                files_glob: self.files_glob.unwrap_or_else(|| filename.clone()),
                filename,
                is_dir: self.is_dir,
            },
            (None, Some(filename_prefix)) => {
                if self.is_dir || self.files_glob.is_some() {
                    return Err(invalid(
                        platform,
                        &application,
                        "prefix targets match single files and derive files_glob from the match",
                    ));
                }
                Locator::Prefix { filename_prefix }
            }
            (Some(_), Some(_)) => {
                return Err(invalid(
                    platform,
                    &application,
                    "filename and filename_prefix are mutually exclusive",
                ))
            }
            (None, None) => {
                return Err(invalid(
                    platform,
                    &application,
                    "one of filename or filename_prefix is required",
                ))
            }
        };

        Ok(Target { application, locator })
    }
}

fn invalid(platform: Platform, application: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidTarget {
        platform,
        application: application.to_string(),
        reason: reason.to_string(),
    }
}
