//! Command-line interface for trawl.
//!
//! Every leaf of the interactive command tree is also reachable as a
//! one-shot subcommand for scripting. With no subcommand the interactive
//! shell starts, unless `--no-interactive` suppresses it (help prints and
//! the process exits instead).

mod commands;

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell as CompletionShell};

use crate::config::Config;
use crate::error::Result;

/// Interactive CLI/TUI client for remote log search and analysis.
#[derive(Debug, Parser)]
#[command(name = "trawl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run. Omit it to enter the interactive shell.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Remote indexer base URL (overrides the config file).
    #[arg(long, global = true, env = "TRAWL_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Bearer token for the remote (overrides the config file).
    #[arg(long, global = true, env = "TRAWL_TOKEN")]
    pub token: Option<String>,

    /// Path to a custom configuration file.
    #[arg(long, global = true, env = "TRAWL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for list-style commands.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "TRAWL_OUTPUT")]
    pub output: OutputFormat,

    /// Never enter the interactive shell; print help and exit instead.
    #[arg(long, global = true, env = "TRAWL_NO_INTERACTIVE")]
    pub no_interactive: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "TRAWL_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "TRAWL_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

/// Output format for list-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Comma-separated values.
    Csv,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a search and print its results.
    #[command(alias = "q", alias = "search")]
    Query(commands::query::QueryArgs),

    /// Manage saved query expansions.
    #[command(alias = "m")]
    Macros {
        /// Macro operation.
        #[command(subcommand)]
        command: commands::entities::MacroCommands,
    },

    /// Manage installed content kits.
    Kits {
        /// Kit operation.
        #[command(subcommand)]
        command: commands::entities::KitCommands,
    },

    /// Manage saved dashboards.
    #[command(alias = "db")]
    Dashboards {
        /// Dashboard operation.
        #[command(subcommand)]
        command: commands::entities::DashboardCommands,
    },

    /// Manage field extractors.
    #[command(alias = "ex")]
    Extractors {
        /// Extractor operation.
        #[command(subcommand)]
        command: commands::entities::ExtractorCommands,
    },

    /// Manage recurring searches.
    #[command(alias = "sched")]
    Scheduled {
        /// Scheduled-search operation.
        #[command(subcommand)]
        command: commands::entities::ScheduledCommands,
    },

    /// Start the interactive shell explicitly.
    Shell,

    /// View configuration.
    #[command(alias = "cfg")]
    Config {
        /// Config operation.
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Load configuration and apply CLI overrides.
fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to load config from {}: {}",
                path.display(),
                e
            );
            Config::default()
        }),
        None => Config::load().unwrap_or_default(),
    };

    if cli.remote_url.is_some() {
        config.remote.url = cli.remote_url.clone();
    }
    if cli.token.is_some() {
        config.remote.token = cli.token.clone();
    }
    config
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    let config = load_config(&cli);

    match &cli.command {
        None => {
            if cli.no_interactive {
                // Bare navigation/help text instead of a prompt.
                let mut cmd = Cli::command();
                cmd.print_help()
                    .map_err(|e| crate::error::TrawlError::io("printing help", e))?;
                Ok(())
            } else {
                commands::shell::run(config)
            }
        }
        Some(Commands::Shell) => commands::shell::run(config),
        Some(Commands::Query(args)) => commands::query::run(&cli, &config, args),
        Some(Commands::Macros { command }) => commands::entities::run_macros(&cli, &config, command),
        Some(Commands::Kits { command }) => commands::entities::run_kits(&cli, &config, command),
        Some(Commands::Dashboards { command }) => {
            commands::entities::run_dashboards(&cli, &config, command)
        }
        Some(Commands::Extractors { command }) => {
            commands::entities::run_extractors(&cli, &config, command)
        }
        Some(Commands::Scheduled { command }) => {
            commands::entities::run_scheduled(&cli, &config, command)
        }
        Some(Commands::Config { command }) => commands::config::run(&config, command),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "trawl", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_to_filter() {
        assert_eq!(LogLevel::Error.to_filter_string(), "error");
        assert_eq!(LogLevel::Trace.to_filter_string(), "trace");
    }

    #[test]
    fn test_default_output_format() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
