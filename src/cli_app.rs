//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use thiserror::Error;

use pii_sweep::core::config::Config;
use pii_sweep::core::errors::SweepError;
use pii_sweep::core::paths::{expand_home, resolve_absolute_path};
use pii_sweep::report::{OutputMode, Reporter, ScanEvent};
use pii_sweep::scanner::filter::IgnoreSpec;
use pii_sweep::scanner::patterns::PatternSet;
use pii_sweep::scanner::walker::{TreeWalker, WalkerConfig};

/// psw — scan a file tree for sensitive-looking text.
#[derive(Debug, Parser)]
#[command(
    name = "psw",
    author,
    version,
    about = "Scan a file tree for sensitive-looking text (emails, keys, tokens, IDs)",
    long_about = None
)]
pub struct Cli {
    /// File or directory to scan.
    #[arg(value_name = "TARGET_PATH", required_unless_present = "completions")]
    target: Option<PathBuf>,
    /// Replace the configured list of skipped file extensions.
    /// Pass with no values to disable extension skipping entirely.
    #[arg(long = "skip-ext", value_name = "EXT", num_args = 0..)]
    skip_ext: Option<Vec<String>>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Worker thread count (default from config).
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
    /// Emit line-delimited JSON instead of human output.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Suppress the banner and non-fatal warnings.
    #[arg(short, long)]
    quiet: bool,
    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<CompletionShell>,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input: missing target, bad config path, bad arguments.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) => 3,
        }
    }
}

impl From<SweepError> for CliError {
    fn from(err: SweepError) -> Self {
        match &err {
            SweepError::RootNotFound { .. }
            | SweepError::MissingConfig { .. }
            | SweepError::ConfigParse { .. }
            | SweepError::InvalidPattern { .. } => Self::User(err.to_string()),
            SweepError::Io { .. } => Self::Runtime(err.to_string()),
            SweepError::Serialization { .. } | SweepError::ChannelClosed { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Parse configuration, start the walk, and drain the event stream.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let binary_name = command.get_name().to_string();
        generate(shell, &mut command, binary_name, &mut io::stdout());
        return Ok(());
    }

    let Some(target) = &cli.target else {
        return Err(CliError::User("a target path is required".to_string()));
    };

    let config = Config::load(cli.config.as_deref())?;
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let reporter = Reporter::new(mode, cli.quiet);

    let (patterns, warnings) = PatternSet::compile(&config.rules, &config.suppressions);
    for warning in &warnings {
        reporter.emit(&ScanEvent::ConfigWarning {
            rule: warning.rule.clone(),
            message: warning.message.clone(),
        });
    }

    let ignore = IgnoreSpec::from_config(&config.ignore, cli.skip_ext.as_deref());
    let root = resolve_absolute_path(&expand_home(target));

    let extensions = cli
        .skip_ext
        .clone()
        .unwrap_or_else(|| config.ignore.extensions.clone());
    reporter.banner(&root.display().to_string(), &config.ignore.folders, &extensions);

    let walker = TreeWalker::new(
        WalkerConfig {
            root,
            parallelism: cli.jobs.unwrap_or(config.scan.parallelism),
        },
        patterns,
        ignore,
    );

    for event in walker.stream()? {
        reporter.emit(&event);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_contract() {
        assert_eq!(CliError::User("x".to_string()).exit_code(), 1);
        assert_eq!(CliError::Runtime("x".to_string()).exit_code(), 2);
        assert_eq!(CliError::Internal("x".to_string()).exit_code(), 3);
    }

    #[test]
    fn fatal_scan_errors_map_to_user_errors() {
        let err = CliError::from(SweepError::RootNotFound {
            path: PathBuf::from("/gone"),
        });
        assert!(matches!(err, CliError::User(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn per_file_io_maps_to_runtime() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CliError::from(SweepError::io("/f", io));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn cli_parses_scan_invocation() {
        let cli = Cli::try_parse_from([
            "psw", "/tmp/scan", "--skip-ext", "png", "jpg", "--jobs", "2", "--json",
        ])
        .unwrap();
        assert_eq!(cli.target.as_deref(), Some(std::path::Path::new("/tmp/scan")));
        assert_eq!(
            cli.skip_ext.as_deref(),
            Some(&["png".to_string(), "jpg".to_string()][..])
        );
        assert_eq!(cli.jobs, Some(2));
        assert!(cli.json);
    }

    #[test]
    fn empty_skip_ext_is_distinct_from_absent() {
        let with_flag = Cli::try_parse_from(["psw", "/tmp/scan", "--skip-ext"]).unwrap();
        assert_eq!(with_flag.skip_ext.as_deref(), Some(&[][..]));

        let without = Cli::try_parse_from(["psw", "/tmp/scan"]).unwrap();
        assert!(without.skip_ext.is_none());
    }

    #[test]
    fn completions_do_not_require_a_target() {
        let cli = Cli::try_parse_from(["psw", "--completions", "bash"]).unwrap();
        assert!(cli.target.is_none());
        assert!(cli.completions.is_some());
    }
}
