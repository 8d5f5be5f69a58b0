#![deny(missing_docs)]

//! # apidoc CLI
//!
//! Command Line Interface for generating prose API documentation from
//! OpenAPI specs.
//!
//! Supported Commands:
//! - `generate`: Spec -> per-endpoint generated docs -> Markdown / HTML file.
//! - `inspect`: Prints the normalized spec (no remote calls).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod anthropic;
mod error;
mod generate;
mod inspect;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generate API documentation from OpenAPI specs")]
struct Cli {
    /// Enable verbose logging.
    #[clap(long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates documentation for every endpoint of a spec.
    Generate(generate::GenerateArgs),
    /// Prints the normalized spec as JSON or YAML.
    Inspect(inspect::InspectArgs),
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "apidoc=debug,apidoc_core=debug"
    } else {
        "apidoc=info,apidoc_core=info"
    }
}

fn init_tracing(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
