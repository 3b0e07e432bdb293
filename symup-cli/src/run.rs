//! The upload run: validate configuration, then resolve and upload every target.

use anyhow::Context;
use std::path::Path;
use symup_core::{
    build_version, Catalog, CommandRunner, ConfigError, Credentials, EnvSource, FailurePolicy,
    Pipeline, Platform, Resolver, RunSummary, Uploader, DATABASE_ENV, DEFAULT_UPLOADER,
};
use symup_platform::{detect_host, NoopRunner, ProcessRunner};
use tracing::{debug, error, info, warn};

use crate::settings::Settings;
use crate::Cli;

/// Environment variable overriding the uploader executable.
pub const UPLOADER_ENV: &str = "SYMBOL_UPLOAD_BIN";

/// Run the pipeline. `Ok(false)` means the run finished but must exit non-zero.
///
/// Configuration and credentials are checked before the build tree is touched.
pub fn execute(cli: &Cli, settings: &Settings, env: &impl EnvSource) -> anyhow::Result<bool> {
    let database = env.require(DATABASE_ENV)?;
    let credentials = Credentials::from_env(env)?;

    let platform = match cli.platform {
        Some(platform) => platform,
        None => detect_host()?,
    };

    let app_version = non_empty("--app-version", &cli.app_version)?;
    let git_hash = non_empty("--git-hash", &cli.git_hash)?;
    let qt_version = non_empty("--qt-version", &cli.qt_version)?;

    if cli.multibundle && platform != Platform::Macos {
        warn!(
            "--multibundle is set but platform is '{}'; the suffix will still be appended",
            platform
        );
    }
    let version = build_version(app_version, git_hash, qt_version, platform, cli.multibundle);

    let build_dir = resolve_build_dir(&cli.build_dir)?;

    let catalog = match cli.catalog.as_ref().or(settings.catalog.as_ref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::embedded()?,
    };
    let targets = catalog.targets(platform).map_err(ConfigError::from)?;
    debug!(excluded = ?catalog.excluded(), "Applications never uploaded");

    let program = cli
        .uploader
        .clone()
        .or_else(|| env.non_empty(UPLOADER_ENV))
        .or_else(|| settings.uploader.clone())
        .unwrap_or_else(|| DEFAULT_UPLOADER.to_string());

    info!("Platform  : {}", platform);
    info!("Build dir : {}", build_dir.display());
    info!("Version   : {}", version);
    info!("Database  : {}", database);
    info!("Auth      : {}", credentials.kind());
    info!("Uploader  : {}{}", program, if cli.dry_run { " (dry run)" } else { "" });
    info!("Targets   : {}", targets.len());

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(NoopRunner)
    } else {
        Box::new(ProcessRunner)
    };
    let uploader = Uploader::new(runner, database, version, credentials).with_program(program);
    let policy = if cli.fail_fast { FailurePolicy::FailFast } else { FailurePolicy::Continue };

    let summary = Pipeline::new(targets, Resolver::new(build_dir, platform), uploader)
        .with_policy(policy)
        .run();

    if let Some(path) = &cli.report {
        write_report(path, &summary)?;
    }

    let success = summary.is_success(cli.strict);
    if cli.strict && !summary.missing.is_empty() {
        let message =
            format!("{} expected artifact(s) missing and --strict is set", summary.missing.len());
        error!("{}", message);
        eprintln!("[ERROR] {message}");
    }
    Ok(success)
}

fn non_empty<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyArgument(name));
    }
    Ok(value)
}

fn resolve_build_dir(path: &Path) -> Result<std::path::PathBuf, ConfigError> {
    match std::fs::canonicalize(path) {
        Ok(dir) if dir.is_dir() => Ok(dir),
        _ => Err(ConfigError::BuildDirNotFound(path.to_path_buf())),
    }
}

fn write_report(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    info!(?path, "Wrote run report");
    Ok(())
}
