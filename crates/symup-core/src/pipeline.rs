//! Pipeline driver: resolve and upload every catalog target in order.

use crate::upload::{CommandRunner, Uploader};
use crate::{Platform, Resolver, Target};
use serde::Serialize;
use tracing::{error, info, warn};

/// What happens after an upload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep uploading the remaining targets.
    #[default]
    Continue,
    /// Stop at the first failure; remaining targets are reported as skipped.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTarget {
    pub application: String,
    /// Name or pattern that was searched for.
    pub searched_for: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    pub application: String,
    pub exit_code: Option<i32>,
    pub message: String,
}

/// Outcome of one pass over the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub platform: Platform,
    pub version: String,
    pub total: usize,
    pub uploaded: Vec<String>,
    pub missing: Vec<MissingTarget>,
    pub failed: Vec<FailedUpload>,
    /// Targets never attempted because of [`FailurePolicy::FailFast`].
    pub skipped: Vec<String>,
}

impl RunSummary {
    /// Whether the run should exit with status zero.
    ///
    /// Missing artifacts only count against the run when `strict` is set.
    pub fn is_success(&self, strict: bool) -> bool {
        self.failed.is_empty() && self.skipped.is_empty() && (!strict || self.missing.is_empty())
    }

    pub fn missing_applications(&self) -> Vec<&str> {
        self.missing.iter().map(|m| m.application.as_str()).collect()
    }
}

pub struct Pipeline<'a, R> {
    targets: &'a [Target],
    resolver: Resolver,
    uploader: Uploader<R>,
    policy: FailurePolicy,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    pub fn new(targets: &'a [Target], resolver: Resolver, uploader: Uploader<R>) -> Self {
        Self { targets, resolver, uploader, policy: FailurePolicy::default() }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Best-effort pass over all targets. Never aborts on a missing artifact.
    pub fn run(&self) -> RunSummary {
        let platform = self.resolver.platform();
        let mut summary = RunSummary {
            platform,
            version: self.uploader.version().to_string(),
            total: self.targets.len(),
            uploaded: Vec::new(),
            missing: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };

        for (index, target) in self.targets.iter().enumerate() {
            let Some(artifact) = self.resolver.resolve(target) else {
                let searched_for = target.search_label(platform);
                warn!(
                    "Artifact '{}' not found, skipping '{}'",
                    searched_for, target.application
                );
                summary.missing.push(MissingTarget {
                    application: target.application.clone(),
                    searched_for,
                });
                continue;
            };

            match self.uploader.upload(&artifact) {
                Ok(()) => summary.uploaded.push(target.application.clone()),
                Err(e) => {
                    error!("{}", e);
                    summary.failed.push(FailedUpload {
                        application: e.application().to_string(),
                        exit_code: e.exit_code(),
                        message: e.to_string(),
                    });
                    if self.policy == FailurePolicy::FailFast {
                        summary.skipped = self.targets[index + 1..]
                            .iter()
                            .map(|t| t.application.clone())
                            .collect();
                        break;
                    }
                }
            }
        }

        info!("Uploaded: {} / {} target(s)", summary.uploaded.len(), summary.total);
        if !summary.missing.is_empty() {
            warn!("Not found: {}", summary.missing_applications().join(", "));
        }
        if !summary.failed.is_empty() {
            let failed: Vec<_> = summary.failed.iter().map(|f| f.application.as_str()).collect();
            error!("Failed: {}", failed.join(", "));
        }
        if !summary.skipped.is_empty() {
            warn!("Skipped after failure: {}", summary.skipped.join(", "));
        }

        summary
    }
}
