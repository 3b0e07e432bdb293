mod logging;
mod run;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use symup_core::{Platform, ProcessEnv};

#[derive(Parser, Debug)]
#[command(
    name = "symup",
    version,
    about = "Upload debug symbols of a release build to BugSplat",
    after_help = "Authentication: set SYMBOL_UPLOAD_CLIENT_ID + SYMBOL_UPLOAD_CLIENT_SECRET \
                  or SYMBOL_UPLOAD_USER + SYMBOL_UPLOAD_PASSWORD. \
                  BUGSPLAT_DATABASE names the target database."
)]
pub struct Cli {
    /// Root of the build output directory to search for debug artifacts
    #[arg(long, short = 'b', value_name = "DIR")]
    pub build_dir: PathBuf,

    /// Application version with underscores, e.g. 1_1_0
    #[arg(long, value_name = "VERSION")]
    pub app_version: String,

    /// Short git commit hash, e.g. gf4373acf9
    #[arg(long, value_name = "HASH")]
    pub git_hash: String,

    /// Qt version with underscores, e.g. Qt_6_10
    #[arg(long, value_name = "QT_VERSION")]
    pub qt_version: String,

    /// Target platform: linux, windows or macos. Auto-detected from the host OS when omitted
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Append '-multibundle' to the version string (macOS builds)
    #[arg(long)]
    pub multibundle: bool,

    /// Resolve artifacts and print upload commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failed upload
    #[arg(long)]
    pub fail_fast: bool,

    /// Exit non-zero when any expected artifact is missing
    #[arg(long)]
    pub strict: bool,

    /// Target catalog YAML replacing the built-in one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Uploader executable (default: symbol-upload)
    #[arg(long, value_name = "PROGRAM")]
    pub uploader: Option<String>,

    /// Write a JSON run summary to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Settings file (default: <config dir>/symup/settings.yaml)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

fn parse_platform(value: &str) -> Result<Platform, symup_core::ConfigError> {
    value.parse()
}

/// Tagged line printed to stderr for errors that end the run.
fn fatal_message(error: &anyhow::Error) -> String {
    format!("[ERROR] {error:#}")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Settings feed the logging setup, so they load first and report problems afterwards.
    let (settings, settings_warning) = match settings::load(cli.settings.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) if cli.settings.is_none() => (settings::Settings::default(), Some(e)),
        Err(e) => {
            eprintln!("{}", fatal_message(&e));
            return ExitCode::FAILURE;
        }
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| "info".into());
    let log_dir = cli.log_dir.clone().or_else(|| settings.log_dir.clone());
    logging::init(&log_level, log_dir.as_deref());

    if let Some(e) = settings_warning {
        tracing::warn!("Ignoring settings file: {:#}", e);
    }

    match run::execute(&cli, &settings, &ProcessEnv) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{}", fatal_message(&e));
            ExitCode::FAILURE
        }
    }
}
