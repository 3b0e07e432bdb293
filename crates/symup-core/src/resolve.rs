//! Artifact resolution: find each target's debug artifact in a build tree.

use crate::{Locator, Platform, Target};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A target matched to a path on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    pub application: String,
    pub path: PathBuf,
    /// Parent of `path`; the uploader's `--directory`.
    pub directory: PathBuf,
    /// The uploader's `--files` selector.
    pub files_glob: String,
}

/// Searches a build tree for the artifacts of one platform.
///
/// The walk is breadth-first with entries sorted by name, so the first match
/// is the shallowest one and ties break the same way on every filesystem.
/// Symlinked directories are not followed.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    platform: Platform,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self { root: root.into(), platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Locate `target`. `None` means the artifact is not in the tree.
    pub fn resolve(&self, target: &Target) -> Option<ResolvedArtifact> {
        let (path, files_glob) = match &target.locator {
            Locator::Prefix { filename_prefix } => {
                let suffix = self.platform.debug_suffix();
                let path = self.find(|path, name| {
                    name.starts_with(filename_prefix.as_str())
                        && name.ends_with(suffix)
                        && path.is_file()
                })?;
                // The exact file name becomes the selector; no wildcards reach the uploader.
                let files_glob = path.file_name()?.to_string_lossy().into_owned();
                (path, files_glob)
            }
            Locator::Exact { filename, is_dir, files_glob } => {
                let path = self.find(|path, name| {
                    let kind_matches = if *is_dir { path.is_dir() } else { path.is_file() };
                    name == filename.as_str() && kind_matches
                })?;
                (path, files_glob.clone())
            }
        };

        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        debug!(application = %target.application, ?path, "Resolved artifact");

        Some(ResolvedArtifact {
            application: target.application.clone(),
            path,
            directory,
            files_glob,
        })
    }

    fn find(&self, mut matches: impl FnMut(&Path, &str) -> bool) -> Option<PathBuf> {
        let mut queue = VecDeque::from([self.root.clone()]);

        while let Some(dir) = queue.pop_front() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(?dir, error = %e, "Skipping unreadable directory");
                    continue;
                }
            };

            let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
            entries.sort_by_key(|e| e.file_name());

            for entry in entries {
                let path = entry.path();
                let name = entry.file_name();

                // Non-UTF-8 names never match, but their subtrees are still searched.
                if let Some(name) = name.to_str() {
                    if matches(&path, name) {
                        return Some(path);
                    }
                }

                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    queue.push_back(path);
                }
            }
        }

        None
    }
}
