//! Error types shared across the pipeline.

use crate::catalog::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems, detected before any filesystem search.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable '{0}' is not set or empty")]
    MissingEnv(String),
    #[error("argument '{0}' must not be empty")]
    EmptyArgument(&'static str),
    #[error("unsupported platform: '{0}'")]
    UnsupportedPlatform(String),
    #[error("build directory does not exist: {}", .0.display())]
    BuildDirNotFound(PathBuf),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Neither credential pair is complete.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "no valid authentication found; set SYMBOL_UPLOAD_CLIENT_ID + SYMBOL_UPLOAD_CLIENT_SECRET \
         or SYMBOL_UPLOAD_USER + SYMBOL_UPLOAD_PASSWORD"
    )]
    NoCredentials,
}

/// A single target's upload failed. Scoped to that target.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("symbol upload failed for '{application}' (exit code {})", exit_code_label(.exit_code))]
    Failed {
        application: String,
        exit_code: Option<i32>,
    },
    #[error("failed to start uploader for '{application}': {source}")]
    Spawn {
        application: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    pub fn application(&self) -> &str {
        match self {
            UploadError::Failed { application, .. } | UploadError::Spawn { application, .. } => {
                application
            }
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            UploadError::Failed { exit_code, .. } => *exit_code,
            UploadError::Spawn { .. } => None,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none, terminated by signal".into(),
    }
}
