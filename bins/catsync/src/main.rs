//! catsync - incremental message catalog translation
//!
//! Translates the keys each locale catalog is missing and keeps every catalog
//! in the key order of its source catalog.

use catsync_core::exit_codes;
use catsync_core::logging::{self, LogConfig, LogFormat};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod context;
mod output;

use commands::{audit, locales, sync};
use context::Overrides;

/// Keep translated message catalogs in sync with their source catalog
#[derive(Parser)]
#[command(name = "catsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogStyle::Compact)]
    log_format: LogStyle,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate missing keys for every configured locale
    Sync {
        /// Only sync these locales (repeatable)
        #[arg(short, long = "locale")]
        locales: Vec<String>,

        /// Keys per provider request
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Locales translated at the same time
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Report translation coverage without calling the provider
    Audit {
        /// Specific locale to audit (audits all if not specified)
        locale: Option<String>,

        /// Show missing keys
        #[arg(short, long)]
        missing: bool,

        /// Limit number of missing keys to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List configured locales
    Locales,
}

/// Command output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogStyle {
    Compact,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig {
            log_level: "warn".to_string(),
            ..LogConfig::default()
        }
    };
    let log_format = match cli.log_format {
        LogStyle::Compact => LogFormat::Compact,
        LogStyle::Json => LogFormat::Json,
    };
    if let Err(e) = logging::init(&log_config.with_format(log_format)) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Sync {
            locales,
            chunk_size,
            concurrency,
        } => {
            let overrides = Overrides {
                locales,
                chunk_size,
                concurrency,
            };
            sync::run(config, overrides, cli.format).await
        }

        Commands::Audit { locale, missing, limit } => audit::run(config, locale.as_deref(), missing, limit, cli.format),

        Commands::Locales => locales::run(config, cli.format),
    };

    match result {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            if cli.format == Format::Json {
                if let Some(err) = e.downcast_ref::<catsync_core::Error>() {
                    let _ = output::json(&err.to_report());
                }
            }
            exit_code(error_exit_code(&e))
        }
    }
}

/// Map a top-level failure to its process exit code
fn error_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<catsync_core::Error>() {
        Some(e) if e.code.category() == "Configuration" => exit_codes::CONFIG_ERROR,
        Some(e) if e.code.category() == "Catalog" => exit_codes::STORE_ERROR,
        _ => exit_codes::FAILURE,
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
