//! # depvar CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity flags map onto a tracing `EnvFilter`
//! so unreachable-pattern warnings from schema loading are visible with
//! default settings.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use depvar_cli::check::{run_check, CheckArgs};
use depvar_cli::inspect::{run_inspect, InspectArgs};
use depvar_cli::resolve::{run_resolve, ResolveArgs};

/// depvar — dependent-variant schema tooling
///
/// Loads schema descriptors emitted by the front end and answers the
/// runtime's questions from the command line: which variants are legal for
/// a dependency tuple, and whether an instance descriptor validates.
#[derive(Parser, Debug)]
#[command(name = "depvar", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List message types, signatures, variants, and pattern tables.
    Inspect(InspectArgs),

    /// Print the variant tags legal for a dependency tuple.
    Resolve(ResolveArgs),

    /// Validate an instance descriptor against its schema.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Resolve(args) => run_resolve(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
