//! # endurance
//!
//! Runs the endurance harness against a deployed web client.
//!
//! ## Commands
//!
//! - `run`: Start the station, observers and fault injector and run until
//!   something breaks (or the cycle budget is spent, or Ctrl-C)
//! - `config`: Print the default configuration file
//! - `check`: Validate a configuration file and show what a run would do
//!
//! ## Example
//!
//! ```bash
//! # Write a starting point
//! endurance config > endurance.toml
//!
//! # Soak test until failure, keeping screenshots of whoever fails
//! endurance run --config endurance.toml --diagnostics-dir ./diagnostics
//!
//! # Replay a previous run's trial sequence for one hour
//! endurance run --seed 1234 --max-cycles 3600
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use endurance_core::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{check, print_config, run};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "endurance.toml";

/// Endurance and chaos harness for the streaming client.
#[derive(Parser, Debug)]
#[command(name = "endurance")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./endurance.toml if present, else built-in defaults)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run until failure, cycle budget, or Ctrl-C
    Run(run::RunArgs),

    /// Print the default configuration
    Config,

    /// Validate the configuration and print a summary
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config => {
            print_config::run()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            check::run(&config);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref())?;
            run::run(config, args).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "endurance_cli=debug,endurance_core=debug,endurance_driver=debug,endurance_infra=debug"
    } else {
        "endurance_cli=info,endurance_core=info,endurance_driver=info,endurance_infra=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Load and validate the configuration.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            fallback
        }
    };

    Config::from_file(&path).with_context(|| format!("Failed to load {}", path.display()))
}
