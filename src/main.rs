//! drdrei CLI entry point.
//!
//! This binary provides the command-line interface for drdrei.

use clap::{CommandFactory, Parser};
use drdrei::cli::Cli;
use drdrei::reporter::Reporter;
use drdrei::{Auditor, Config, DrdreiError, ReportFormat};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut chain = e.chain().skip(1).peekable();
            if chain.peek().is_some() {
                eprintln!("\nCaused by:");
                for (i, cause) in chain.enumerate() {
                    eprintln!("  {i}: {cause}");
                }
            }

            let code = e
                .downcast_ref::<DrdreiError>()
                .map_or(1, DrdreiError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // drdrei at the requested level, everything else at warn
            EnvFilter::new(format!("warn,drdrei={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.paths.is_empty() {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;

    let auditor = Auditor::new(config.clone());
    let report = auditor.run(&cli.paths).await?;

    let format = if config.output.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    let output = Reporter::new(&config).generate(&report, format)?;
    print!("{output}");

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match Config::locate_file(cli.config.as_deref()) {
        Some(path) => {
            eprintln!("Using config file: {}", path.display());
            Config::from_file(&path)?
        }
        None => {
            tracing::debug!("No configuration file found, using default configuration");
            Config::default()
        }
    };

    config.load_from_env()?;
    config.merge_cli_args(cli);

    if !std::io::stdout().is_terminal() {
        config.output.colored = false;
    }

    tracing::debug!(config = ?config, "Configuration loaded");
    Ok(config)
}
