//! ETL pipeline CLI
//!
//! Installs the tracing subscriber for resolver diagnostics, resolves the
//! configuration once, builds the leveled logger from `app.log_level`, and
//! hands both to the selected command.

use anyhow::Context;
use clap::{Parser, Subcommand};
use etl_pipeline::{
    config::{EtlConfig, PlaceholderPolicy, Resolver},
    log_error,
    logging::{LogLevel, Logger, init_tracing},
    pipeline::run_extract,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Extract/transform/load pipeline
#[derive(Parser, Debug)]
#[command(name = "etl-pipeline")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to search for the config document, or the document itself
    #[arg(short, long, env = "ETL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Fail when a ${NAME} placeholder references an unset variable
    #[arg(long, global = true)]
    strict_placeholders: bool,

    /// Level for configuration diagnostics (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract data from the configured sources
    Extract,

    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the resolved configuration as JSON (credentials redacted)
    Show,
    /// Print the path of the config document that would be used
    Path,
}

fn build_resolver(args: &Args) -> Resolver {
    let mut resolver = Resolver::new();
    if let Some(path) = &args.config {
        resolver = resolver.search_path(path);
    }
    if args.strict_placeholders {
        resolver = resolver.placeholder_policy(PlaceholderPolicy::Strict);
    }
    resolver
}

fn start(resolver: &Resolver) -> anyhow::Result<(EtlConfig, Logger)> {
    let config = resolver.resolve()?;
    let logger = Logger::with_level(config.app.log_level);
    Ok((config, logger))
}

fn run(args: Args) -> anyhow::Result<()> {
    init_tracing(LogLevel::parse_lenient(&args.log_level));
    let resolver = build_resolver(&args);

    match args.command {
        Command::Extract => {
            let (config, logger) = start(&resolver)?;
            run_extract(&config, &logger);
        }
        Command::Config {
            action: ConfigAction::Show,
        } => {
            let (config, _logger) = start(&resolver)?;
            let rendered =
                serde_json::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("{rendered}");
        }
        Command::Config {
            action: ConfigAction::Path,
        } => {
            let document = resolver.locate()?;
            println!("{}", document.path.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Resolution may have failed, so the configured level is unknown.
            let logger = Logger::with_level(LogLevel::Info);
            log_error!(logger, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}
