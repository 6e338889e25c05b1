// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Connprobe CLI - one-shot connectivity and credential checks.
//!
//! # Examples
//!
//! ```bash
//! # Resolve a hostname
//! connprobe --type nslookup --connection example.com
//!
//! # Check a storage account key
//! connprobe --type storage --connection "AccountName=acct;AccountKey=..."
//!
//! # Any other kind is a SQL driver name
//! connprobe probe -t mysql -c "app:secret@tcp(db:3306)/orders?tls=custom"
//!
//! # JSON output
//! connprobe --format json --pretty -t cosmos -c "AccountEndpoint=...;AccountKey=..."
//!
//! # List kinds
//! connprobe kinds
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use connprobe_core::ProbeOutcome;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::config::ConfigArgs;
use commands::probe::ProbeArgs;
use commands::{kinds, probe};
use config::Config;

// ============================================================================
// CLI Definition
// ============================================================================

/// Connprobe CLI - connectivity probes.
#[derive(Parser)]
#[command(name = "connprobe")]
#[command(about = "One-shot connectivity and credential probes")]
#[command(long_about = r#"
Connprobe attempts one minimal handshake against a backend and reports
a status code and a diagnostic message.

Kinds:
  • DNS lookup (nslookup)
  • Key Vault (keyvault)
  • Cosmos DB (cosmos)
  • Storage Account (storage)
  • Application Insights (insights)
  • anything else is a SQL driver: mysql, postgres, pgx, sqlite, ...

Exit codes: 0 for 2xx, 2 for 4xx, 1 otherwise.
"#)]
#[command(version)]
#[command(author = "Connprobe Contributors")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to run. If none, probes with --type/--connection.
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Probe timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (message only, no logs).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one probe (default if no command specified).
    #[command(visible_alias = "p")]
    Probe(ProbeArgs),

    /// List known kinds.
    #[command(visible_alias = "k")]
    Kinds,

    /// Inspect configuration.
    Config(ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// 2xx outcome, or a command that succeeded.
    Success = 0,
    /// 5xx outcome, or a CLI error.
    Error = 1,
    /// 4xx outcome: the input was rejected.
    InputError = 2,
}

impl ExitCode {
    /// Maps a probe outcome to an exit code.
    pub fn for_outcome(outcome: &ProbeOutcome) -> Self {
        if outcome.is_success() {
            Self::Success
        } else if outcome.is_client_error() {
            Self::InputError
        } else {
            Self::Error
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: &str) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("connprobe=debug,info")
    } else {
        EnvFilter::try_new(format!("connprobe={level}")).unwrap_or_else(|_| EnvFilter::new("connprobe=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    std::process::exit(code as i32);
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;

    setup_logging(cli.verbose, cli.quiet, &config.general.log_level);

    match &cli.command {
        Some(Commands::Probe(args)) => {
            let outcome = probe::run(args, cli, &config).await?;
            Ok(ExitCode::for_outcome(&outcome))
        }
        Some(Commands::Kinds) => kinds::run(cli).map(|()| ExitCode::Success),
        Some(Commands::Config(args)) => {
            commands::config::run(args, cli, &config).map(|()| ExitCode::Success)
        }
        None => {
            // Default to the probe command
            let outcome = probe::run(&cli.probe, cli, &config).await?;
            Ok(ExitCode::for_outcome(&outcome))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::ok("x")), ExitCode::Success);
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::no_content("x")), ExitCode::Success);
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::new(400, "x")), ExitCode::InputError);
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::new(404, "x")), ExitCode::InputError);
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::new(500, "x")), ExitCode::Error);
        assert_eq!(ExitCode::for_outcome(&ProbeOutcome::new(503, "x")), ExitCode::Error);
    }

    #[test]
    fn test_parse_top_level_probe() {
        let cli = Cli::try_parse_from(["connprobe", "--type", "mysql", "--connection", " dsn "]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.probe.kind.as_deref(), Some("mysql"));
        assert_eq!(cli.probe.connection.as_deref(), Some(" dsn "));
    }

    #[test]
    fn test_parse_probe_subcommand() {
        let cli = Cli::try_parse_from([
            "connprobe", "probe", "-t", "nslookup", "-c", "localhost", "--format", "json", "--timeout", "3",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Probe(args)) => assert_eq!(args.kind.as_deref(), Some("nslookup")),
            _ => panic!("expected probe subcommand"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.timeout, Some(3));
    }

    #[test]
    fn test_parse_kinds() {
        let cli = Cli::try_parse_from(["connprobe", "kinds", "--pretty"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Kinds)));
        assert!(cli.pretty);
    }
}
