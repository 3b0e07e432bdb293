//! `CommandRunner` implementations.

use std::io;
use std::process::{Command, Stdio};
use symup_core::{CommandRunner, Invocation, ProcessOutput};
use tracing::{debug, info};

/// Spawns the program and waits for it, capturing stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        debug!(program = %invocation.program, "Spawning uploader");
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()?;

        let result = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = ?result.exit_code, "Uploader exited");
        Ok(result)
    }
}

/// Dry-run runner: logs the redacted command and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRunner;

impl CommandRunner for NoopRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        info!(command = %invocation.redacted(), "Dry run, not executing");
        Ok(ProcessOutput { exit_code: Some(0), ..Default::default() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_output_and_exit_code() {
        let out = ProcessRunner
            .run(&invocation("sh", &["-c", "echo uploaded; echo warning >&2; exit 3"]))
            .unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stdout.trim(), "uploaded");
        assert_eq!(out.stderr.trim(), "warning");
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_success() {
        let out = ProcessRunner.run(&invocation("true", &[])).unwrap();
        assert!(out.success());
    }

    #[test]
    fn test_process_runner_missing_program() {
        let err = ProcessRunner
            .run(&invocation("symup-test-no-such-uploader", &["--database", "db"]))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_noop_runner_succeeds_without_spawning() {
        let out = NoopRunner
            .run(&invocation("symup-test-no-such-uploader", &["--password", "hunter2"]))
            .unwrap();
        assert!(out.success());
        assert!(out.stdout.is_empty());
    }
}
