//! Upload dispatch: one uploader invocation per resolved artifact.

use crate::error::UploadError;
use crate::redact::redact;
use crate::{Credentials, ResolvedArtifact};
use tracing::{info, warn};

/// Executable invoked when nothing else is configured.
pub const DEFAULT_UPLOADER: &str = "symbol-upload";

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Command line with credential values masked, safe to log.
    pub fn redacted(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(redact(&self.args))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands. Blocks until the process exits.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        (**self).run(invocation)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        (**self).run(invocation)
    }
}

/// Builds uploader command lines and runs them.
pub struct Uploader<R> {
    runner: R,
    program: String,
    database: String,
    version: String,
    credentials: Credentials,
}

impl<R: CommandRunner> Uploader<R> {
    pub fn new(
        runner: R,
        database: impl Into<String>,
        version: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            runner,
            program: DEFAULT_UPLOADER.into(),
            database: database.into(),
            version: version.into(),
            credentials,
        }
    }

    /// Use a different uploader executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The full command line for one artifact, credentials included.
    pub fn invocation(&self, artifact: &ResolvedArtifact) -> Invocation {
        let mut args: Vec<String> = vec![
            "--database".into(),
            self.database.clone(),
            "--application".into(),
            artifact.application.clone(),
            "--version".into(),
            self.version.clone(),
            "--directory".into(),
            artifact.directory.to_string_lossy().into_owned(),
            "--files".into(),
            artifact.files_glob.clone(),
            // Let the uploader run dump_syms and send the .sym instead of the raw artifact.
            "--dumpSyms".into(),
            "true".into(),
        ];
        args.extend(self.credentials.to_flags());

        Invocation { program: self.program.clone(), args }
    }

    /// Upload one artifact. A failure only concerns this artifact.
    pub fn upload(&self, artifact: &ResolvedArtifact) -> Result<(), UploadError> {
        let invocation = self.invocation(artifact);

        info!(application = %artifact.application, "Uploading");
        info!(artifact = %artifact.path.display(), "  Artifact");
        info!(command = %invocation.redacted(), "  Command");

        let output = self.runner.run(&invocation).map_err(|source| UploadError::Spawn {
            application: artifact.application.clone(),
            source,
        })?;

        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            info!(target: "symbol_upload", "{}", line);
        }
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!(target: "symbol_upload", "{}", line);
        }

        if !output.success() {
            return Err(UploadError::Failed {
                application: artifact.application.clone(),
                exit_code: output.exit_code,
            });
        }

        info!(application = %artifact.application, "Uploaded successfully");
        Ok(())
    }
}
